//! Operator console: blocking prompts and the per-hour allocation loop.
//!
//! The console is the only component that performs I/O. It is generic over
//! reader and writer so tests can script entire sessions; the binary connects
//! stdin and stdout. The core (registry, ledger, engine, simulator) never
//! reads or writes anything itself.

use std::io::{self, BufRead, Write};

use thiserror::Error;

use crate::error::{RegistryError, SimulationError};
use crate::registry::{Role, Weekday};
use crate::sim::day::DaySimulator;
use crate::sim::engine::AllocationEngine;
use crate::sim::summary::DaySummary;

/// Day prompt, fixed by the original operator contract.
pub const DAY_PROMPT: &str = "Enter the day of the week for the simulation (e.g., 'Sunday'): ";

/// Errors that end an operator session.
#[derive(Debug, Error)]
pub enum ConsoleError {
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// The input stream ended while a prompt was still waiting for a value.
    #[error("input stream closed before a valid value was entered")]
    InputClosed,

    /// The retry policy ran out of attempts.
    #[error("no valid input after {attempts} attempts")]
    AttemptsExhausted { attempts: u32 },

    #[error(transparent)]
    Simulation(#[from] SimulationError),
}

/// Blocking prompt-driven console over arbitrary reader/writer pairs.
pub struct Console<R, W> {
    input: R,
    output: W,
    max_attempts: u32,
}

impl<R: BufRead, W: Write> Console<R, W> {
    /// # Panics
    ///
    /// Panics if `max_attempts` is zero; config validation rejects that
    /// before a console is ever built.
    pub fn new(input: R, output: W, max_attempts: u32) -> Self {
        assert!(max_attempts > 0, "max_attempts must be > 0");
        Self {
            input,
            output,
            max_attempts,
        }
    }

    /// Reads one line; `None` at end of input.
    fn read_line(&mut self) -> io::Result<Option<String>> {
        let mut line = String::new();
        let n = self.input.read_line(&mut line)?;
        if n == 0 { Ok(None) } else { Ok(Some(line)) }
    }

    /// Prompts for the simulation day until a valid weekday is entered.
    ///
    /// Invalid input prints the literal operator message and re-prompts, up
    /// to the configured attempt limit.
    ///
    /// # Errors
    ///
    /// [`ConsoleError::AttemptsExhausted`] once the retry policy runs out,
    /// [`ConsoleError::InputClosed`] on end of input.
    pub fn prompt_day(&mut self) -> Result<Weekday, ConsoleError> {
        for _ in 0..self.max_attempts {
            write!(self.output, "{DAY_PROMPT}")?;
            self.output.flush()?;
            let Some(line) = self.read_line()? else {
                return Err(ConsoleError::InputClosed);
            };
            match line.parse::<Weekday>() {
                Ok(day) => return Ok(day),
                Err(err) => writeln!(self.output, "{err}")?,
            }
        }
        Err(ConsoleError::AttemptsExhausted {
            attempts: self.max_attempts,
        })
    }

    /// Prompts for a non-negative participant count.
    ///
    /// Anything that does not parse as a non-negative integer prints the
    /// literal operator message and re-prompts, up to the attempt limit.
    ///
    /// # Errors
    ///
    /// Same as [`prompt_day`](Self::prompt_day).
    pub fn prompt_count(&mut self, role: Role) -> Result<i64, ConsoleError> {
        for _ in 0..self.max_attempts {
            write!(self.output, "Enter the number of {} (e.g., 3): ", role.plural())?;
            self.output.flush()?;
            let Some(line) = self.read_line()? else {
                return Err(ConsoleError::InputClosed);
            };
            match line.trim().parse::<i64>() {
                Ok(count) if count >= 0 => return Ok(count),
                _ => writeln!(self.output, "{}", RegistryError::InvalidCount { role })?,
            }
        }
        Err(ConsoleError::AttemptsExhausted {
            attempts: self.max_attempts,
        })
    }

    fn print_help(&mut self) -> io::Result<()> {
        writeln!(self.output, "Commands:")?;
        writeln!(
            self.output,
            "  <prosumer> <consumer> <kWh>   allocate energy between two participants"
        )?;
        writeln!(self.output, "  balances                      list remaining quantities")?;
        writeln!(self.output, "  suggest                       list viable prosumer/consumer pairs")?;
        writeln!(self.output, "  done                          close this hour")?;
        writeln!(self.output, "  help                          show this message")
    }

    fn print_balances(&mut self, engine: &AllocationEngine) -> io::Result<()> {
        for (i, kwh) in engine.surpluses().iter().enumerate() {
            writeln!(self.output, "  prosumer {}: {kwh:.2} kWh surplus", i + 1)?;
        }
        for (i, kwh) in engine.demands().iter().enumerate() {
            writeln!(self.output, "  consumer {}: {kwh:.2} kWh demand", i + 1)?;
        }
        Ok(())
    }

    fn print_suggestions(&mut self, engine: &AllocationEngine) -> io::Result<()> {
        let mut any = false;
        let pairs: Vec<(usize, usize)> = engine.suggest_matches().collect();
        for (prosumer, consumer) in pairs {
            writeln!(self.output, "  prosumer {prosumer} -> consumer {consumer}")?;
            any = true;
        }
        if !any {
            writeln!(self.output, "  no viable pairs remain")?;
        }
        Ok(())
    }

    /// Runs the allocation loop for one hour.
    ///
    /// Accepts commands until `done` (or end of input, which also closes the
    /// hour — piped scripts terminate cleanly). Engine rejections are printed
    /// and the hour stays open for a corrected retry.
    pub fn run_hour(&mut self, engine: &mut AllocationEngine) -> io::Result<()> {
        writeln!(self.output)?;
        writeln!(
            self.output,
            "== Hour {} | {} prosumers, {} consumers | type 'help' for commands ==",
            engine.hour(),
            engine.prosumer_count(),
            engine.consumer_count()
        )?;

        loop {
            write!(self.output, "hour {}> ", engine.hour())?;
            self.output.flush()?;
            let Some(line) = self.read_line()? else {
                engine.close();
                return Ok(());
            };

            let tokens: Vec<&str> = line.split_whitespace().collect();
            match tokens.as_slice() {
                [] => {}
                ["done"] | ["close"] | ["skip"] => {
                    engine.close();
                    return Ok(());
                }
                ["help"] => self.print_help()?,
                ["balances"] => self.print_balances(engine)?,
                ["suggest"] => self.print_suggestions(engine)?,
                [prosumer, consumer, amount] => {
                    let request = (
                        prosumer.parse::<usize>(),
                        consumer.parse::<usize>(),
                        amount.parse::<f32>(),
                    );
                    let (Ok(prosumer), Ok(consumer), Ok(amount_kwh)) = request else {
                        writeln!(
                            self.output,
                            "expected `<prosumer> <consumer> <kWh>`, e.g. `1 2 3.5`"
                        )?;
                        continue;
                    };
                    match engine.apply(prosumer, consumer, amount_kwh) {
                        Ok(receipt) => writeln!(
                            self.output,
                            "allocated {amount_kwh:.2} kWh: prosumer {prosumer} has \
                             {:.2} kWh left, consumer {consumer} needs {:.2} kWh",
                            receipt.prosumer_remaining_kwh, receipt.consumer_remaining_kwh
                        )?,
                        Err(err) => writeln!(self.output, "{err}")?,
                    }
                }
                _ => writeln!(self.output, "unrecognized command; type 'help'")?,
            }
        }
    }

    /// Drives a full day: one [`run_hour`](Self::run_hour) loop per hour.
    ///
    /// # Errors
    ///
    /// I/O failures abort the session (remaining hours are closed untouched
    /// so the simulator finishes cleanly); a repeated run surfaces the
    /// simulator's [`SimulationError::AlreadyComplete`].
    pub fn drive(&mut self, simulator: &mut DaySimulator) -> Result<DaySummary, ConsoleError> {
        let mut failure: Option<io::Error> = None;
        let summary = simulator.run(|engine| {
            if failure.is_some() {
                engine.close();
                return;
            }
            if let Err(err) = self.run_hour(engine) {
                failure = Some(err);
            }
        })?;
        match failure {
            Some(err) => Err(ConsoleError::Io(err)),
            None => Ok(summary),
        }
    }
}
