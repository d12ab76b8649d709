use charades_core::{Session, TimerSignal};
use charades_types::{SessionError, SessionSnapshot};
use thiserror::Error;
use tokio::sync::{mpsc, oneshot};
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

const COMMAND_BUFFER: usize = 64;

#[derive(Debug, Error)]
pub enum HostError {
    #[error(transparent)]
    Session(#[from] SessionError),
    #[error("session host is no longer running")]
    Closed,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HostCommand {
    RegisterPlayer { name: String },
    CreateTeams { name_a: String, name_b: String },
    SelectCategory { name: String },
    DrawWord { category: Option<String> },
    CorrectGuess,
    PassTurn,
    StartCountdown { seconds: Option<u32> },
    CancelCountdown,
    RestartRound,
    Reset,
    Snapshot,
    Shutdown,
}

type Reply = oneshot::Sender<Result<SessionSnapshot, SessionError>>;

#[derive(Debug)]
struct Envelope {
    command: HostCommand,
    reply: Reply,
}

/// Owns one session on a dedicated task. Commands and countdown signals are
/// both applied on that task, so session state and observer notifications
/// never leave it.
pub struct SessionHost {
    session: Session,
    commands: mpsc::Receiver<Envelope>,
    timer_signals: mpsc::UnboundedReceiver<TimerSignal>,
}

impl SessionHost {
    pub fn spawn(
        session: Session,
        timer_signals: mpsc::UnboundedReceiver<TimerSignal>,
    ) -> (HostHandle, JoinHandle<()>) {
        let (commands_tx, commands) = mpsc::channel(COMMAND_BUFFER);
        let host = SessionHost {
            session,
            commands,
            timer_signals,
        };

        let task = tokio::spawn(host.run());
        (HostHandle { commands: commands_tx }, task)
    }

    async fn run(mut self) {
        info!("Session host started");

        loop {
            tokio::select! {
                Some(signal) = self.timer_signals.recv() => {
                    self.session.handle_timer_signal(signal);
                }
                envelope = self.commands.recv() => {
                    let Some(Envelope { command, reply }) = envelope else {
                        debug!("All host handles dropped");
                        break;
                    };

                    if command == HostCommand::Shutdown {
                        self.session.set_observer(None);
                        let _ = reply.send(Ok(self.session.snapshot()));
                        break;
                    }

                    let result = self.apply(&command).map(|_| self.session.snapshot());
                    if let Err(e) = &result {
                        warn!("Rejected {:?}: {}", command, e);
                    }
                    let _ = reply.send(result);
                }
            }
        }

        // Teardown: no observer left, no countdown left scheduled
        self.session.set_observer(None);
        info!("Session host stopped");
    }

    fn apply(&mut self, command: &HostCommand) -> Result<(), SessionError> {
        let session = &mut self.session;
        match command {
            HostCommand::RegisterPlayer { name } => session.register_player(name).map(|_| ()),
            HostCommand::CreateTeams { name_a, name_b } => {
                session.create_teams(name_a, name_b);
                Ok(())
            }
            HostCommand::SelectCategory { name } => session.select_category(name).map(|_| ()),
            HostCommand::DrawWord { category } => {
                session.draw_word(category.as_deref()).map(|_| ())
            }
            HostCommand::CorrectGuess => session.record_correct_guess(),
            HostCommand::PassTurn => session.advance_turn(),
            HostCommand::StartCountdown { seconds } => {
                let seconds = seconds.unwrap_or(session.round_duration_seconds());
                session.start_countdown(seconds).map(|_| ())
            }
            HostCommand::CancelCountdown => {
                session.cancel_countdown();
                Ok(())
            }
            HostCommand::RestartRound => session.restart_round(),
            HostCommand::Reset => {
                session.reset_session();
                Ok(())
            }
            HostCommand::Snapshot | HostCommand::Shutdown => Ok(()),
        }
    }
}

/// Cloneable handle for sending commands to a running [`SessionHost`].
#[derive(Clone)]
pub struct HostHandle {
    commands: mpsc::Sender<Envelope>,
}

impl HostHandle {
    /// Apply a command and return the session state right after it.
    pub async fn send(&self, command: HostCommand) -> Result<SessionSnapshot, HostError> {
        let (reply, response) = oneshot::channel();
        self.commands
            .send(Envelope { command, reply })
            .await
            .map_err(|_| HostError::Closed)?;

        let result = response.await.map_err(|_| HostError::Closed)?;
        Ok(result?)
    }

    pub async fn register_player(&self, name: &str) -> Result<SessionSnapshot, HostError> {
        self.send(HostCommand::RegisterPlayer {
            name: name.to_string(),
        })
        .await
    }

    pub async fn create_teams(&self, name_a: &str, name_b: &str) -> Result<SessionSnapshot, HostError> {
        self.send(HostCommand::CreateTeams {
            name_a: name_a.to_string(),
            name_b: name_b.to_string(),
        })
        .await
    }

    pub async fn select_category(&self, name: &str) -> Result<SessionSnapshot, HostError> {
        self.send(HostCommand::SelectCategory {
            name: name.to_string(),
        })
        .await
    }

    pub async fn correct_guess(&self) -> Result<SessionSnapshot, HostError> {
        self.send(HostCommand::CorrectGuess).await
    }

    pub async fn pass_turn(&self) -> Result<SessionSnapshot, HostError> {
        self.send(HostCommand::PassTurn).await
    }

    pub async fn restart_round(&self) -> Result<SessionSnapshot, HostError> {
        self.send(HostCommand::RestartRound).await
    }

    pub async fn snapshot(&self) -> Result<SessionSnapshot, HostError> {
        self.send(HostCommand::Snapshot).await
    }

    /// Unregister the observer, cancel the countdown and stop the host task.
    pub async fn shutdown(&self) -> Result<SessionSnapshot, HostError> {
        self.send(HostCommand::Shutdown).await
    }
}
