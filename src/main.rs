use std::time::Duration;
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;
use tracing_subscriber::{EnvFilter, FmtSubscriber};

use neuralator::config::AppConfig;
use neuralator::driver::EffectExecutor;
use neuralator::kernel::event::{Event, InputEvent, RecognitionSignal};
use neuralator::kernel::travel::{find_zone, quiet_zones};
use neuralator::services::llm::GeminiService;
use neuralator::Reactor;

const HELP: &str = "commands: press | open | map | close | debug | type <text> | hear <text> | submit \
| zones | go <n|zone name> | go <meters> <destination> | cancel | dismiss \
| feed on|off | bpm <n> | hrv <ms> | status | quit";

enum Command {
    Send(InputEvent),
    Print(String),
    Quit,
}

fn parse_command(line: &str) -> Command {
    let line = line.trim();
    let (head, rest) = match line.split_once(char::is_whitespace) {
        Some((head, rest)) => (head, rest.trim()),
        None => (line, ""),
    };

    match head.to_ascii_lowercase().as_str() {
        "press" => Command::Send(InputEvent::Press),
        "open" => Command::Send(InputEvent::OpenApp),
        "map" => Command::Send(InputEvent::ShowMap),
        "close" => Command::Send(InputEvent::CloseMap),
        "debug" => Command::Send(InputEvent::ToggleDebug),
        "type" => Command::Send(InputEvent::SetTranscript(rest.to_string())),
        "hear" => Command::Send(InputEvent::Recognition(RecognitionSignal::Fragment {
            text: rest.to_string(),
            is_final: true,
        })),
        "submit" => Command::Send(InputEvent::SubmitTranscript),
        "zones" => Command::Print(
            quiet_zones()
                .iter()
                .enumerate()
                .map(|(i, z)| format!("{}. {} ({}m) - {}", i + 1, z.name, z.distance_m, z.description))
                .collect::<Vec<_>>()
                .join("\n"),
        ),
        "go" => parse_travel(rest),
        "cancel" => Command::Send(InputEvent::CancelTravel),
        "dismiss" => Command::Send(InputEvent::DismissNotification),
        "feed" => match rest {
            "on" => Command::Send(InputEvent::SetFeedEnabled(true)),
            "off" => Command::Send(InputEvent::SetFeedEnabled(false)),
            _ => Command::Print("usage: feed on|off".to_string()),
        },
        "bpm" => match rest.parse() {
            Ok(bpm) => Command::Send(InputEvent::SetExternalHeartRate(bpm)),
            Err(_) => Command::Print("usage: bpm <n>".to_string()),
        },
        "hrv" => match rest.parse() {
            Ok(hrv) => Command::Send(InputEvent::SetExternalHrv(hrv)),
            Err(_) => Command::Print("usage: hrv <ms>".to_string()),
        },
        "status" => Command::Send(InputEvent::ReportStatus),
        "quit" | "exit" => Command::Quit,
        _ => Command::Print(HELP.to_string()),
    }
}

fn parse_travel(rest: &str) -> Command {
    if let Ok(index) = rest.parse::<usize>() {
        return match quiet_zones().get(index.wrapping_sub(1)) {
            Some(zone) => Command::Send(InputEvent::travel_to(zone)),
            None => Command::Print("no such zone, see `zones`".to_string()),
        };
    }
    if let Some(zone) = find_zone(rest) {
        return Command::Send(InputEvent::travel_to(&zone));
    }
    match rest.split_once(char::is_whitespace) {
        Some((meters, destination)) => match meters.parse() {
            Ok(distance_m) => Command::Send(InputEvent::StartTravel {
                destination: destination.trim().to_string(),
                distance_m,
            }),
            Err(_) => Command::Print("usage: go <n|zone name> | go <meters> <destination>".to_string()),
        },
        None => Command::Print("usage: go <n|zone name> | go <meters> <destination>".to_string()),
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    // 1. Setup Logging
    let subscriber = FmtSubscriber::builder()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    let config = AppConfig::from_env()?;
    if config.service.api_key.is_none() {
        tracing::warn!("GEMINI_API_KEY not set; analysis and notifications will use fallbacks");
    }
    tracing::info!("Neuralator simulator booting...");

    // 2. Setup Reactor + Channels
    let (tx, rx) = mpsc::channel(100);
    let mut reactor = Reactor::new(rx, tx.clone(), config.reactor.clone());

    let service = GeminiService::new(&config.service);
    let call_timeout = Duration::from_millis(config.service.timeout_ms);
    let mut executor = EffectExecutor::new(service, reactor.sender(), call_timeout);

    let shutdown = CancellationToken::new();

    // 3. Stdin commands
    let input_shutdown = shutdown.clone();
    tokio::spawn(async move {
        let reader = BufReader::new(tokio::io::stdin());
        let mut lines = reader.lines();
        println!("{}", HELP);

        while let Ok(Some(line)) = lines.next_line().await {
            if line.trim().is_empty() {
                continue;
            }
            match parse_command(&line) {
                Command::Send(event) => {
                    if let Err(e) = tx.send(Event::Input(event)).await {
                        tracing::error!("Failed to send input: {}", e);
                        break;
                    }
                }
                Command::Print(text) => println!("{}", text),
                Command::Quit => break,
            }
        }
        input_shutdown.cancel();
    });

    // 4. Ctrl+C
    let signal_shutdown = shutdown.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            signal_shutdown.cancel();
        }
    });

    // 5. Run Kernel
    tracing::info!("Simulator active. Type `status` or `quit`.");
    reactor.run(&mut executor, shutdown).await;
    Ok(())
}
