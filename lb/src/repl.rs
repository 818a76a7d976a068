//! Interactive lunchbox builder
//!
//! Numbers pick items while choosing; free text chats with the coach once the
//! lunchbox is finished. Planner actions are slash commands.

use std::path::PathBuf;

use colored::Colorize;
use eyre::Result;
use rustyline::DefaultEditor;
use rustyline::error::ReadlineError;
use tracing::debug;

use crate::domain::{SavedLunchbox, Weekday};
use crate::export;
use crate::session::{FlowStep, LunchboxSession};

/// Default output path for `/print`
pub const DEFAULT_PRINT_PATH: &str = "madpakke-plan.html";

/// Parsed slash command
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SlashCommand {
    Help,
    Quit,
    Reset,
    Week,
    Magic,
    Close,
    Save(Weekday),
    Remove(Weekday),
    Show(Weekday),
    Print(PathBuf),
}

/// Parse a line starting with `/`
pub fn parse_slash(input: &str) -> Result<SlashCommand, String> {
    let mut parts = input.split_whitespace();
    let cmd = parts.next().unwrap_or("");
    let arg = parts.next();

    let day = |arg: Option<&str>| -> Result<Weekday, String> {
        arg.ok_or_else(|| format!("{} needs a weekday", cmd))?.parse()
    };

    match cmd {
        "/help" | "/h" => Ok(SlashCommand::Help),
        "/quit" | "/q" | "/exit" => Ok(SlashCommand::Quit),
        "/reset" => Ok(SlashCommand::Reset),
        "/week" | "/w" => Ok(SlashCommand::Week),
        "/magic" => Ok(SlashCommand::Magic),
        "/close" => Ok(SlashCommand::Close),
        "/save" => day(arg).map(SlashCommand::Save),
        "/remove" | "/rm" => day(arg).map(SlashCommand::Remove),
        "/show" => day(arg).map(SlashCommand::Show),
        "/print" => Ok(SlashCommand::Print(PathBuf::from(arg.unwrap_or(DEFAULT_PRINT_PATH)))),
        _ => Err(format!("Unknown command: {}", cmd)),
    }
}

enum SlashResult {
    Continue,
    Quit,
}

/// Interactive REPL session
pub struct ReplSession {
    session: LunchboxSession,
}

impl ReplSession {
    pub fn new(session: LunchboxSession) -> Self {
        Self { session }
    }

    /// Run the REPL main loop
    pub async fn run(&mut self) -> Result<()> {
        self.print_welcome();
        self.print_step();

        let mut rl = DefaultEditor::new().map_err(|e| eyre::eyre!("Failed to initialize readline: {}", e))?;

        loop {
            let readline = rl.readline(&format!("{} ", ">".bright_green()));

            match readline {
                Ok(line) => {
                    let input = line.trim();
                    if input.is_empty() {
                        continue;
                    }
                    let _ = rl.add_history_entry(input);

                    if input.starts_with('/') {
                        match self.handle_slash_command(input).await? {
                            SlashResult::Continue => continue,
                            SlashResult::Quit => break,
                        }
                    } else {
                        self.process_user_input(input).await;
                    }
                }
                Err(ReadlineError::Interrupted) => {
                    println!("^C");
                    continue;
                }
                Err(ReadlineError::Eof) => {
                    println!();
                    break;
                }
                Err(err) => {
                    return Err(eyre::eyre!("Readline error: {}", err));
                }
            }
        }

        println!("Farvel! Spis som en superhelt! 🦸");
        Ok(())
    }

    fn print_welcome(&self) {
        println!();
        println!("{}", "🧙 MADPAKKE-MAGIKEREN 🧙".bright_magenta().bold());
        println!("Byg din egen supermadpakke i fire trin!");
        println!("Type {} for help, {} to quit", "/help".yellow(), "/quit".yellow());
        println!();
    }

    /// Show what the flow expects next
    fn print_step(&self) {
        match self.session.step() {
            FlowStep::Choosing(category) => {
                println!("{}", category.step_title().bright_cyan().bold());
                for (i, item) in self.session.choices().iter().enumerate() {
                    println!(
                        "  {} {} {:<18} {:>6} kr  {}",
                        format!("{}.", i + 1).yellow(),
                        item.emoji,
                        item.name,
                        item.price.to_string(),
                        item.description.dimmed()
                    );
                }
                if !self.session.selection().is_empty() {
                    println!("  {} {} kr", "I alt:".dimmed(), self.session.current_total());
                }
            }
            FlowStep::Finalizing => {
                println!("{}", "Magikeren tænker...".dimmed());
            }
            FlowStep::Finalized => {
                self.print_finalized();
            }
        }
    }

    fn print_finalized(&self) {
        println!();
        println!("{}", "💥 MADPAKKEN ER KLAR! 💥".bright_yellow().bold());
        for item in self.session.selection().chosen() {
            println!("  {} {}", item.emoji, item.name);
        }
        println!("  {} {} kr", "Pris:".bold(), self.session.current_total());
        let image = if self.session.image().is_some() {
            "🖼️  Billede tryllet frem".green()
        } else {
            "Intet billede denne gang".dimmed()
        };
        println!("  {}", image);
        if let Some(first) = self.session.transcript().first() {
            println!();
            println!("{} {}", "🧙".bright_magenta(), first.text);
        }
        println!();
        println!(
            "Chat with the wizard, {} it, or {} for a new one",
            "/save <dag>".yellow(),
            "/reset".yellow()
        );
    }

    /// Numbered choice while choosing, chat once finalized
    async fn process_user_input(&mut self, input: &str) {
        debug!(step = ?self.session.step(), "process_user_input: called");
        match self.session.step() {
            FlowStep::Choosing(category) => {
                let item = match input.parse::<usize>() {
                    Ok(n) => match n.checked_sub(1).and_then(|i| self.session.choices().get(i).copied()) {
                        Some(item) => item,
                        None => {
                            println!("{} Pick a number between 1 and {}", "?".yellow(), self.session.choices().len());
                            return;
                        }
                    },
                    Err(_) => match crate::domain::catalog::find(input) {
                        Some(item) => item,
                        None => {
                            println!("{} Pick a {} item by number", "?".yellow(), category);
                            return;
                        }
                    },
                };
                if category.next().is_none() {
                    println!("{}", "✨ Magikeren tænker... ✨".dimmed());
                }
                match self.session.choose(item).await {
                    Ok(_) => self.print_step(),
                    Err(e) => println!("{} {}", "!".red(), e),
                }
            }
            FlowStep::Finalizing => {}
            FlowStep::Finalized => match self.session.send_message(input).await {
                Ok(reply) => println!("{} {}", "🧙".bright_magenta(), reply),
                Err(e) => println!("{} {}", "!".red(), e),
            },
        }
    }

    async fn handle_slash_command(&mut self, input: &str) -> Result<SlashResult> {
        let cmd = match parse_slash(input) {
            Ok(cmd) => cmd,
            Err(e) => {
                println!("{} {}", "?".yellow(), e);
                println!("Type {} for available commands", "/help".yellow());
                return Ok(SlashResult::Continue);
            }
        };
        debug!(?cmd, "handle_slash_command: parsed");

        match cmd {
            SlashCommand::Help => self.print_help(),
            SlashCommand::Quit => return Ok(SlashResult::Quit),
            SlashCommand::Reset => {
                self.session.reset();
                println!("{}", "Ny madpakke!".dimmed());
                self.print_step();
            }
            SlashCommand::Week => {
                print!("{}", export::render_text(&export::summarize(self.session.plan(), &export::today())));
            }
            SlashCommand::Magic => {
                println!("{}", "✨ Tryller en hel uge frem... ✨".dimmed());
                self.session.bulk_generate().await;
                print!("{}", export::render_text(&export::summarize(self.session.plan(), &export::today())));
            }
            SlashCommand::Save(day) => match self.session.save_current(day) {
                Ok(()) => {
                    println!("{} Gemt på {}", "✓".green(), day);
                    self.print_step();
                }
                Err(e) => println!("{} {}", "!".red(), e),
            },
            SlashCommand::Remove(day) => match self.session.remove(day) {
                Some(_) => println!("{} {} er ryddet", "✓".green(), day),
                None => println!("{}", format!("{} var ikke planlagt", day).dimmed()),
            },
            SlashCommand::Show(day) => match self.session.open_detail(day) {
                Some(lunchbox) => print_detail(day, lunchbox),
                None => println!("{}", format!("{}: {}", day, export::UNPLANNED).dimmed()),
            },
            SlashCommand::Close => {
                self.session.close_detail();
            }
            SlashCommand::Print(path) => {
                export::write_html(self.session.plan(), &path)?;
                println!("{} Printark gemt: {}", "✓".green(), path.display());
            }
        }
        Ok(SlashResult::Continue)
    }

    fn print_help(&self) {
        println!();
        println!("{}", "Available Commands:".bright_cyan());
        println!("  {:16} Show this help", "/help".yellow());
        println!("  {:16} Exit", "/quit".yellow());
        println!("  {:16} Start a new lunchbox", "/reset".yellow());
        println!("  {:16} Save the finished lunchbox on a day", "/save <dag>".yellow());
        println!("  {:16} Clear a day", "/remove <dag>".yellow());
        println!("  {:16} Show a planned day", "/show <dag>".yellow());
        println!("  {:16} Close the day view", "/close".yellow());
        println!("  {:16} Show the weekly plan", "/week".yellow());
        println!("  {:16} Generate a random week", "/magic".yellow());
        println!("  {:16} Write the printable plan (default {})", "/print [PATH]".yellow(), DEFAULT_PRINT_PATH);
        println!();
        println!("Days: mandag, tirsdag, onsdag, torsdag, fredag (or man, tir, ...)");
        println!();
    }
}

fn print_detail(day: Weekday, lunchbox: &SavedLunchbox) {
    println!();
    println!("{}", day.label().to_uppercase().bright_yellow().bold());
    for (category, item) in lunchbox.selection.slots() {
        match item {
            Some(item) => println!("  {:<8} {} {}  {} kr", category.label(), item.emoji, item.name, item.price),
            None => println!("  {:<8} -", category.label()),
        }
    }
    println!("  {} {} kr", "Pris:".bold(), lunchbox.total_price());
    if lunchbox.image.is_some() {
        println!("  {}", "🖼️  Med billede (se /print)".green());
    }
    println!("Type {} to close", "/close".yellow());
}
