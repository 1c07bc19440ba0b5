//! Test-case file driver
//!
//! Runs the line-oriented case format against the core:
//!
//! ```text
//! T <name>      begin a case (resets the CPU)
//! U <hex>       mask of flag bits checked after execution
//! R <flags> <AX> <BX> <CX> <DX> <SI> <DI> <BP> <SP> <IP> <CS> <DS> <ES> <SS>
//!               before X: load registers; after X: expected registers
//! @<addr> <v>   before X: pre-load a memory byte; after X: expect it
//! X             run until an instruction retires with no prefix active
//! # ...         comment
//! ```
//!
//! Files may be gzip-compressed (`.gz`). Cases that dispatch an
//! undefined opcode are flagged `[UNDF]` and skip their assertions
//! without counting as failures.

use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

use colored::Colorize;
use flate2::read::GzDecoder;
use thiserror::Error;

use crate::bus::Bus;
use crate::cpu::{Cpu, Reg};
use crate::memory::Ram;

/// Case-file errors. Assertion failures are not errors; they land in
/// the report.
#[derive(Debug, Error)]
pub enum CaseError {
    #[error(transparent)]
    Io(#[from] std::io::Error),
    #[error("line {line}: {message}")]
    Syntax { line: usize, message: String },
}

/// Aggregated pass/fail counts for one file (or the whole run).
pub struct Report {
    pub title: String,
    /// Suppress per-case PASS lines
    pub quiet: bool,
    pub cases_passed: u32,
    pub cases_failed: u32,
    pub cases_undefined: u32,
    pub checks_passed: u32,
    pub checks_failed: u32,
}

impl Report {
    pub fn new(title: &str) -> Self {
        Self {
            title: title.to_string(),
            quiet: false,
            cases_passed: 0,
            cases_failed: 0,
            cases_undefined: 0,
            checks_passed: 0,
            checks_failed: 0,
        }
    }

    pub fn aggregate(&mut self, other: &Report) {
        self.cases_passed += other.cases_passed;
        self.cases_failed += other.cases_failed;
        self.cases_undefined += other.cases_undefined;
        self.checks_passed += other.checks_passed;
        self.checks_failed += other.checks_failed;
    }

    pub fn has_failures(&self) -> bool {
        self.cases_failed > 0
    }

    pub fn print_summary(&self) {
        println!();
        let tag = if self.has_failures() { fail_tag() } else { pass_tag() };
        println!("{tag}   {}", self.title);
        println!(
            "Cases:  {}, failed: {}, passed: {}, undefined: {}",
            self.cases_passed + self.cases_failed + self.cases_undefined,
            self.cases_failed,
            self.cases_passed,
            self.cases_undefined,
        );
        println!(
            "Checks: {}, failed: {}, passed: {}",
            self.checks_passed + self.checks_failed,
            self.checks_failed,
            self.checks_passed,
        );
    }
}

fn pass_tag() -> String {
    format!("{}{}{}", "[".bright_blue(), "PASS".bright_green(), "]".bright_blue())
}

fn fail_tag() -> String {
    format!("{}{}{}", "[".bright_blue(), "FAIL".bright_red(), "]".bright_blue())
}

fn warn_tag() -> String {
    format!("{}{}{}", "[".bright_blue(), "WARN".bright_cyan(), "]".bright_blue())
}

fn undef_tag() -> String {
    format!("{}{}{}", "[".bright_blue(), "UNDF".bright_yellow(), "]".bright_blue())
}

/// Bus for the driver: 1 MiB of RAM, floating ports, undefined-opcode
/// capture scoped to the current case.
struct CaseBus {
    ram: Ram,
    undefined: bool,
}

impl Bus for CaseBus {
    fn mem_read8(&mut self, addr: u32) -> u8 {
        self.ram.mem_read8(addr)
    }

    fn mem_write8(&mut self, addr: u32, value: u8) {
        self.ram.mem_write8(addr, value)
    }

    fn undefined_opcode(&mut self, _opcode: u16) {
        self.undefined = true;
    }
}

/// One in-flight test case.
struct Case {
    name: String,
    failed: bool,
    executed: bool,
    flag_mask: u16,
}

/// Case-file runner: one CPU and memory image reused across cases.
pub struct Runner {
    cpu: Cpu,
    bus: CaseBus,
}

/// Register order of the R line.
const R_LINE: [Reg; 14] = [
    Reg::Flags,
    Reg::Ax,
    Reg::Bx,
    Reg::Cx,
    Reg::Dx,
    Reg::Si,
    Reg::Di,
    Reg::Bp,
    Reg::Sp,
    Reg::Ip,
    Reg::Cs,
    Reg::Ds,
    Reg::Es,
    Reg::Ss,
];

impl Runner {
    pub fn new() -> Self {
        Self {
            cpu: Cpu::new(),
            bus: CaseBus {
                ram: Ram::new(),
                undefined: false,
            },
        }
    }

    /// Run every case in a file, `.gz` transparently decompressed.
    pub fn run_file(&mut self, path: &Path, report: &mut Report) -> Result<(), CaseError> {
        let file = File::open(path)?;
        if path.extension().is_some_and(|ext| ext == "gz") {
            self.run_cases(BufReader::new(GzDecoder::new(file)), report)
        } else {
            self.run_cases(BufReader::new(file), report)
        }
    }

    /// Run every case from a reader.
    pub fn run_cases<R: BufRead>(&mut self, reader: R, report: &mut Report) -> Result<(), CaseError> {
        let mut case: Option<Case> = None;

        for (index, line) in reader.lines().enumerate() {
            let number = index + 1;
            let raw = line?;
            let text = raw.split('#').next().unwrap_or("").trim();
            if text.is_empty() {
                continue;
            }

            let (token, rest) = text.split_at(1);
            match token {
                "T" => {
                    if let Some(done) = case.take() {
                        self.complete(done, report);
                    }
                    self.cpu.reset();
                    self.bus.undefined = false;
                    case = Some(Case {
                        name: rest.trim().to_string(),
                        failed: false,
                        executed: false,
                        flag_mask: 0xFFFF,
                    });
                }
                "U" => {
                    let case = expect_case(&mut case, number)?;
                    case.flag_mask = parse_hex(rest.trim(), number)? as u16;
                }
                "R" => {
                    let mut values = [0u16; 14];
                    let mut fields = rest.split_whitespace();
                    for slot in values.iter_mut() {
                        let token = fields.next().ok_or_else(|| CaseError::Syntax {
                            line: number,
                            message: "R line needs 14 register fields".into(),
                        })?;
                        *slot = parse_hex(token, number)? as u16;
                    }
                    let case = expect_case(&mut case, number)?;
                    if case.executed {
                        self.expect_registers(case, &values, report);
                    } else {
                        self.load_registers(&values);
                    }
                }
                "@" => {
                    let mut fields = rest.split_whitespace();
                    let addr = fields.next().map(|t| parse_auto(t, number)).transpose()?;
                    let value = fields.next().map(|t| parse_auto(t, number)).transpose()?;
                    let (addr, value) = match (addr, value) {
                        (Some(a), Some(v)) => (a, v as u8),
                        _ => {
                            return Err(CaseError::Syntax {
                                line: number,
                                message: "@ line needs an address and a byte".into(),
                            })
                        }
                    };
                    let case = expect_case(&mut case, number)?;
                    if case.executed {
                        self.expect_memory(case, addr, value, report);
                    } else {
                        self.bus.ram.poke(addr, value);
                    }
                }
                "X" => {
                    let case = expect_case(&mut case, number)?;
                    loop {
                        self.cpu.tick(&mut self.bus);
                        if self.cpu.at_instruction_boundary() {
                            break;
                        }
                    }
                    case.executed = true;
                }
                other => {
                    return Err(CaseError::Syntax {
                        line: number,
                        message: format!("unknown directive {other:?}"),
                    })
                }
            }
        }

        if let Some(done) = case.take() {
            self.complete(done, report);
        }
        Ok(())
    }

    fn load_registers(&mut self, values: &[u16; 14]) {
        for (reg, &value) in R_LINE.iter().zip(values) {
            self.cpu.reg_set(*reg, value);
        }
        // restart address tracks the loaded CS:IP
        self.cpu.reg_set(Reg::ShadowCs, self.cpu.reg_get(Reg::Cs));
        self.cpu.reg_set(Reg::ShadowIp, self.cpu.reg_get(Reg::Ip));
    }

    fn expect_registers(&mut self, case: &mut Case, values: &[u16; 14], report: &mut Report) {
        if self.bus.undefined {
            return;
        }
        for (reg, &want) in R_LINE.iter().zip(values) {
            let (have, want) = if *reg == Reg::Flags {
                (self.cpu.reg_get(*reg) & case.flag_mask, want & case.flag_mask)
            } else {
                (self.cpu.reg_get(*reg), want)
            };
            check(case, report, have == want, || {
                format!("register {reg:?} has value {have:#06x}, expected {want:#06x}")
            });
        }
    }

    fn expect_memory(&mut self, case: &mut Case, addr: u32, want: u8, report: &mut Report) {
        if self.bus.undefined {
            return;
        }
        // a divide error pushes flags the real CPU leaves undefined;
        // skip the two bytes of that stack slot
        let ss = self.cpu.reg_get(Reg::Ss) as u32;
        let sp = self.cpu.reg_get(Reg::Sp) as u32;
        let stack = ((ss << 4) + sp) & 0xFFFFF;
        if addr == stack + 4 || addr == stack + 5 {
            return;
        }
        let have = self.bus.ram.peek(addr);
        check(case, report, have == want, || {
            format!("memory {addr:#07x} has value {have:#04x}, expected {want:#04x}")
        });
    }

    fn complete(&mut self, case: Case, report: &mut Report) {
        if self.bus.undefined {
            report.cases_undefined += 1;
            if !report.quiet {
                println!("{}   {}", undef_tag(), case.name);
            }
        } else if case.failed {
            report.cases_failed += 1;
        } else {
            report.cases_passed += 1;
            if !report.quiet {
                println!("{}   {}", pass_tag(), case.name);
            }
        }
    }
}

impl Default for Runner {
    fn default() -> Self {
        Self::new()
    }
}

fn check(case: &mut Case, report: &mut Report, ok: bool, message: impl FnOnce() -> String) {
    if ok {
        report.checks_passed += 1;
        return;
    }
    if !case.failed {
        println!("{}   {}", fail_tag(), case.name);
    }
    println!("{}   {}", warn_tag(), message());
    case.failed = true;
    report.checks_failed += 1;
}

fn expect_case<'c>(case: &'c mut Option<Case>, line: usize) -> Result<&'c mut Case, CaseError> {
    case.as_mut().ok_or_else(|| CaseError::Syntax {
        line,
        message: "directive before the first T line".into(),
    })
}

fn parse_hex(token: &str, line: usize) -> Result<u32, CaseError> {
    u32::from_str_radix(token, 16).map_err(|_| CaseError::Syntax {
        line,
        message: format!("bad hex value {token:?}"),
    })
}

/// Addresses and bytes on @ lines take 0x-prefixed hex or decimal.
fn parse_auto(token: &str, line: usize) -> Result<u32, CaseError> {
    let parsed = if let Some(hex) = token.strip_prefix("0x").or_else(|| token.strip_prefix("0X")) {
        u32::from_str_radix(hex, 16)
    } else {
        token.parse()
    };
    parsed.map_err(|_| CaseError::Syntax {
        line,
        message: format!("bad number {token:?}"),
    })
}
