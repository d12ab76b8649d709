use anyhow::Result;
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::signal;
use tokio::sync::mpsc;
use tracing::{info, warn};

use charades_core::{EventFanout, EventLog, Session, TokioCountdownFactory};
use charades_types::SessionEvent;
use charades_host::{
    HostCommand, HostError, SessionHost,
    commands::{ConsoleInput, HELP, parse_line, render_event, render_snapshot},
    config::Config,
};

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt::init();

    info!("Starting charades...");

    let config = Config::from_env()?;
    let session_config = config.session_config()?;
    let countdowns = TokioCountdownFactory::from_current()?;

    let (mut session, timer_signals) = Session::new(session_config, countdowns)?;
    let categories = session.categories().names();

    let (event_tx, mut event_rx) = mpsc::unbounded_channel::<SessionEvent>();
    let observer = EventFanout::new()
        .with_handler(Box::new(EventLog))
        .with_handler(Box::new(event_tx));
    session.set_observer(Some(Box::new(observer)));

    let (host, host_task) = SessionHost::spawn(session, timer_signals);

    tokio::spawn(async move {
        while let Some(event) = event_rx.recv().await {
            println!("{}", render_event(&event));
        }
    });

    println!("{HELP}");
    let mut lines = BufReader::new(tokio::io::stdin()).lines();

    loop {
        let line = tokio::select! {
            line = lines.next_line() => line?,
            _ = signal::ctrl_c() => {
                info!("Received Ctrl+C, shutting down...");
                None
            }
        };
        let Some(line) = line else { break };

        let command = match parse_line(&line) {
            Ok(Some(ConsoleInput::Command(command))) => command,
            Ok(Some(ConsoleInput::Status)) => HostCommand::Snapshot,
            Ok(Some(ConsoleInput::ListCategories)) => {
                println!("{}", categories.join(", "));
                continue;
            }
            Ok(Some(ConsoleInput::Help)) => {
                println!("{HELP}");
                continue;
            }
            Ok(Some(ConsoleInput::Quit)) => break,
            Ok(None) => continue,
            Err(e) => {
                println!("{e}");
                continue;
            }
        };

        let show_status = command == HostCommand::Snapshot;
        match host.send(command).await {
            Ok(snapshot) if show_status => println!("{}", render_snapshot(&snapshot)),
            Ok(_) => {}
            Err(HostError::Closed) => {
                warn!("Session host stopped unexpectedly");
                break;
            }
            Err(e) => println!("{e}"),
        }
    }

    if let Err(e) = host.shutdown().await {
        warn!("Shutdown request failed: {}", e);
    }
    host_task.await?;

    info!("Charades shutdown complete.");
    Ok(())
}
