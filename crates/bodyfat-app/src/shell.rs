//! Line-oriented terminal front end.
//!
//! Reads one command per line from stdin, runs it through [`commands`] and
//! redraws the screen. Alerts are printed above the screen.

use std::io::Write as _;
use std::sync::Mutex as StdMutex;

use tokio::io::{AsyncBufReadExt, BufReader, Lines, Stdin};
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tracing::debug;

use bodyfat_core::measurement::UnitSystem;
use bodyfat_core::models::Gender;
use bodyfat_core::onboarding::{Onboarding, OnboardingStep};

use crate::commands::{self, CalculateOutcome};
use crate::{render, AppState};

/// Shown by `help`
pub const HELP: &str = "\
Commands:
  next | back                 move between steps
  photo add <path...>         add photos (step 1)
  photo rm <n> | photo clear  remove photos (step 1)
  gender <male|female>        age <years>
  height <cm> | height <ft> <in>
  weight <value>              waist <value|->
  units <metric|imperial>     switch units
  calculate                   estimate body fat
  trial                       use the free trial (paywall)
  advice                      personalised advice (result step)
  upgrade | close             open or close the paywall
  offers | buy <id> | restore subscription offers and purchases
  status                      premium status
  start-over                  begin a new calculation
  help | quit";

/// One parsed shell line
#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    /// Photos -> Data
    Next,
    /// Step back
    Back,
    /// Append photos
    PhotoAdd(Vec<String>),
    /// Remove a photo by 1-based position
    PhotoRemove(usize),
    /// Remove all photos
    PhotoClear,
    /// Select gender
    Gender(Gender),
    /// Age text
    Age(String),
    /// Metric height
    HeightCm(String),
    /// Imperial height
    HeightFeetInches(String, String),
    /// Weight in the active unit
    Weight(String),
    /// Waist in the active unit; `None` clears it
    Waist(Option<String>),
    /// Switch units
    Units(UnitSystem),
    /// Calculate
    Calculate,
    /// Use the free trial
    Trial,
    /// Get advice
    Advice,
    /// Open the paywall
    Upgrade,
    /// Close the paywall
    Close,
    /// List offers
    Offers,
    /// Buy an offer
    Buy(String),
    /// Restore purchases
    Restore,
    /// Entitlement status
    Status,
    /// Start over
    StartOver,
    /// Show help
    Help,
    /// Exit
    Quit,
}

fn usage(text: &str) -> String {
    format!("Usage: {}", text)
}

/// Parse one input line.
///
/// Field values are kept as typed; validation happens on `calculate`.
pub fn parse_command(line: &str) -> Result<Command, String> {
    let words: Vec<&str> = line.split_whitespace().collect();
    let Some((&name, args)) = words.split_first() else {
        return Err("Type 'help' for a list of commands".to_string());
    };

    let command = match (name.to_ascii_lowercase().as_str(), args) {
        ("next", []) => Command::Next,
        ("back", []) => Command::Back,
        ("photo", ["add", paths @ ..]) if !paths.is_empty() => {
            Command::PhotoAdd(paths.iter().map(|p| p.to_string()).collect())
        }
        ("photo", ["rm", n]) => Command::PhotoRemove(
            n.parse()
                .map_err(|_| format!("'{}' is not a photo number", n))?,
        ),
        ("photo", ["clear"]) => Command::PhotoClear,
        ("photo", _) => return Err(usage("photo add <path...> | photo rm <n> | photo clear")),
        ("gender", [g]) => Command::Gender(g.parse()?),
        ("gender", _) => return Err(usage("gender <male|female>")),
        ("age", [v]) => Command::Age(v.to_string()),
        ("age", _) => return Err(usage("age <years>")),
        ("height", [cm]) => Command::HeightCm(cm.to_string()),
        ("height", [ft, inches]) => Command::HeightFeetInches(ft.to_string(), inches.to_string()),
        ("height", _) => return Err(usage("height <cm> | height <ft> <in>")),
        ("weight", [v]) => Command::Weight(v.to_string()),
        ("weight", _) => return Err(usage("weight <value>")),
        ("waist", ["-"]) => Command::Waist(None),
        ("waist", [v]) => Command::Waist(Some(v.to_string())),
        ("waist", _) => return Err(usage("waist <value|->")),
        ("units", [u]) => Command::Units(u.parse()?),
        ("units", _) => return Err(usage("units <metric|imperial>")),
        ("calculate", []) => Command::Calculate,
        ("trial", []) => Command::Trial,
        ("advice", []) => Command::Advice,
        ("upgrade", []) => Command::Upgrade,
        ("close", []) => Command::Close,
        ("offers", []) => Command::Offers,
        ("buy", [id]) => Command::Buy(id.to_string()),
        ("buy", _) => return Err(usage("buy <offer id>")),
        ("restore", []) => Command::Restore,
        ("status", []) => Command::Status,
        ("start-over", []) => Command::StartOver,
        ("help", _) | ("?", _) => Command::Help,
        ("quit", _) | ("exit", _) => Command::Quit,
        (other, _) => return Err(format!("Unknown command '{}'. Type 'help'.", other)),
    };
    Ok(command)
}

/// Prints progress lines from ticker channels and waits for them to end
#[derive(Default)]
struct ProgressPrinter {
    tasks: StdMutex<Vec<JoinHandle<()>>>,
}

impl ProgressPrinter {
    fn observe(&self, label: &'static str, mut rx: watch::Receiver<f64>) {
        let task = tokio::spawn(async move {
            loop {
                let value = *rx.borrow_and_update();
                print!("\r{}", render::progress_line(label, value));
                let _ = std::io::stdout().flush();
                if rx.changed().await.is_err() {
                    break;
                }
            }
            println!();
        });
        if let Ok(mut tasks) = self.tasks.lock() {
            tasks.push(task);
        }
    }

    async fn join(&self) {
        let tasks = match self.tasks.lock() {
            Ok(mut tasks) => std::mem::take(&mut *tasks),
            Err(_) => return,
        };
        for task in tasks {
            let _ = task.await;
        }
    }
}

/// Run one command; returns the alert to print, if any
pub async fn execute(state: &AppState, command: Command) -> Result<Option<String>, String> {
    let printer = ProgressPrinter::default();
    let result = dispatch(state, command, &printer).await;
    printer.join().await;
    result
}

async fn dispatch(
    state: &AppState,
    command: Command,
    printer: &ProgressPrinter,
) -> Result<Option<String>, String> {
    let calculating = |rx: watch::Receiver<f64>| printer.observe("Calculating", rx);
    let advising = |rx: watch::Receiver<f64>| printer.observe("Loading advice", rx);

    match command {
        Command::Next => commands::next_step(state).await.map(|_| None),
        Command::Back => commands::back(state).await.map(|_| None),
        Command::PhotoAdd(paths) => commands::add_photos(state, paths)
            .await
            .map(|n| Some(format!("Added {} photo(s)", n))),
        Command::PhotoRemove(index) => commands::remove_photo(state, index)
            .await
            .map(|photo| Some(format!("Removed {}", photo))),
        Command::PhotoClear => commands::clear_photos(state).await.map(|_| None),
        Command::Gender(gender) => commands::set_gender(state, gender).await.map(|_| None),
        Command::Age(age) => commands::set_age(state, age).await.map(|_| None),
        Command::HeightCm(cm) => commands::set_height_cm(state, cm).await.map(|_| None),
        Command::HeightFeetInches(feet, inches) => {
            commands::set_height_feet_inches(state, feet, inches)
                .await
                .map(|_| None)
        }
        Command::Weight(weight) => commands::set_weight(state, weight).await.map(|_| None),
        Command::Waist(waist) => commands::set_waist(state, waist).await.map(|_| None),
        Command::Units(system) => commands::set_units(state, system).await.map(|_| None),
        Command::Calculate => commands::calculate(state, &calculating)
            .await
            .map(paywall_hint),
        Command::Trial => commands::use_free_trial(state, &calculating)
            .await
            .map(paywall_hint),
        Command::Advice => commands::get_advice(state, &advising).await.map(|_| None),
        Command::Upgrade => commands::open_paywall(state).await.map(|_| None),
        Command::Close => commands::close_paywall(state).await.map(|_| None),
        Command::Offers => commands::list_offers(state)
            .await
            .map(|offers| Some(render::paywall(&offers, false))),
        Command::Buy(id) => commands::purchase(state, &id).await,
        Command::Restore => commands::restore(state).await.map(Some),
        Command::Status => {
            let status = commands::refresh_status(state).await?;
            let user = state.gate.current_user_id().await;
            Ok(Some(render::status(&status, user.as_deref())))
        }
        Command::StartOver => commands::start_over(state).await.map(|_| None),
        Command::Help => Ok(Some(HELP.to_string())),
        Command::Quit => Ok(None),
    }
}

fn paywall_hint(outcome: CalculateOutcome) -> Option<String> {
    match outcome {
        CalculateOutcome::Paywall => Some("Premium is required to calculate.".to_string()),
        CalculateOutcome::Completed => None,
    }
}

async fn redraw(state: &AppState) {
    let wizard = state.wizard.lock().await;
    let offers = state.offers.lock().await;
    println!("\n{}", render::screen(&wizard, &offers));
}

fn prompt() {
    print!("> ");
    let _ = std::io::stdout().flush();
}

/// Walk the onboarding carousel; false when input ended or the user quit
async fn onboarding(state: &AppState, lines: &mut Lines<BufReader<Stdin>>) -> std::io::Result<bool> {
    let mut carousel = Onboarding::new();
    loop {
        println!("\n{}", render::onboarding(&carousel));
        prompt();
        let Some(line) = lines.next_line().await? else {
            return Ok(false);
        };
        match line.trim() {
            "" | "next" | "start" => {
                if carousel.next() == OnboardingStep::Complete {
                    break;
                }
            }
            "skip" => break,
            "quit" | "exit" => return Ok(false),
            other => match other.parse::<usize>() {
                Ok(n) if n >= 1 && carousel.go_to(n - 1) => {}
                _ => println!("Press enter to continue, 1-3 to jump, 'skip' to skip"),
            },
        }
    }
    let _ = commands::complete_onboarding(state).await;
    Ok(true)
}

/// Run the shell until `quit` or end of input
pub async fn run(state: &AppState) -> std::io::Result<()> {
    let mut lines = BufReader::new(tokio::io::stdin()).lines();

    let onboarded = state.preferences.lock().await.onboarding_completed;
    if !onboarded && !onboarding(state, &mut lines).await? {
        return Ok(());
    }

    println!("BodyFatAI - type 'help' for commands");
    redraw(state).await;
    loop {
        prompt();
        let Some(line) = lines.next_line().await? else {
            break;
        };
        if line.trim().is_empty() {
            continue;
        }

        let command = match parse_command(&line) {
            Ok(command) => command,
            Err(message) => {
                println!("{}", message);
                continue;
            }
        };
        debug!("Command: {:?}", command);
        if command == Command::Quit {
            break;
        }
        let redraws = !matches!(command, Command::Help | Command::Status | Command::Offers);

        match execute(state, command).await {
            Ok(Some(message)) => println!("{}", message),
            Ok(None) => {}
            Err(alert) => println!("! {}", alert),
        }
        if redraws {
            redraw(state).await;
        }
    }
    Ok(())
}
