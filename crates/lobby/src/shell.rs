//! Interactive console for driving the lobby.
//!
//! Each input line is parsed into a [`ShellCommand`] and executed through a
//! [`LobbyClient`], exactly as a remote front end would talk to the lobby.

use lobby_core::{ClientError, LobbyClient, Message, PlayerInfo};

/// Help text printed by the `help` command.
pub const HELP: &str = "\
Commands:
    login <name> <level> <exp>
    logout <name>
    send <message>
    listplayer
    help (h)
    quit (q)";

/// A parsed console command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ShellCommand {
    /// Register a player
    Login { name: String, level: u32, exp: u64 },
    /// Remove a player
    Logout { name: String },
    /// Broadcast a message to every player
    Send { content: String },
    /// Print every registered player
    ListPlayer,
    /// Print the command list
    Help,
    /// Leave the console
    Quit,
}

/// Why a console line could not be parsed.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ParseError {
    #[error("Unknown command: {0}")]
    Unknown(String),

    #[error("Usage: {0}")]
    Usage(&'static str),

    #[error("Invalid {field}: {value}")]
    InvalidNumber { field: &'static str, value: String },
}

impl ShellCommand {
    /// Parses one console line. Blank lines yield `Ok(None)`.
    pub fn parse(line: &str) -> Result<Option<Self>, ParseError> {
        let mut tokens = line.split_whitespace();
        let Some(verb) = tokens.next() else {
            return Ok(None);
        };
        let args: Vec<&str> = tokens.collect();

        let command = match verb {
            "login" => {
                let [name, level, exp] = args.as_slice() else {
                    return Err(ParseError::Usage("login <name> <level> <exp>"));
                };
                ShellCommand::Login {
                    name: name.to_string(),
                    level: parse_number("level", level)?,
                    exp: parse_number("exp", exp)?,
                }
            }
            "logout" => {
                let [name] = args.as_slice() else {
                    return Err(ParseError::Usage("logout <name>"));
                };
                ShellCommand::Logout {
                    name: name.to_string(),
                }
            }
            "send" => {
                if args.is_empty() {
                    return Err(ParseError::Usage("send <message>"));
                }
                ShellCommand::Send {
                    content: args.join(" "),
                }
            }
            "listplayer" => ShellCommand::ListPlayer,
            "help" | "h" => ShellCommand::Help,
            "quit" | "q" => ShellCommand::Quit,
            other => return Err(ParseError::Unknown(other.to_string())),
        };
        Ok(Some(command))
    }
}

fn parse_number<T: std::str::FromStr>(field: &'static str, value: &str) -> Result<T, ParseError> {
    value.parse().map_err(|_| ParseError::InvalidNumber {
        field,
        value: value.to_string(),
    })
}

/// Result of executing one console line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    /// Text to print; the console keeps running
    Output(String),
    /// The console should stop
    Quit,
}

/// Console state: the lobby connection and the most recent login, which is
/// used as the sender of `send` messages.
#[derive(Debug)]
pub struct Shell {
    client: LobbyClient,
    current: Option<String>,
}

impl Shell {
    /// Creates a console driving the given client.
    pub fn new(client: LobbyClient) -> Self {
        Self {
            client,
            current: None,
        }
    }

    /// Parses and executes one input line.
    ///
    /// Parse failures and lobby rejections are reported as output rather
    /// than errors; only a broken IPC session is returned as `Err`.
    pub async fn execute(&mut self, line: &str) -> Result<Outcome, ClientError> {
        match ShellCommand::parse(line) {
            Ok(Some(command)) => self.run(command).await,
            Ok(None) => Ok(Outcome::Output(String::new())),
            Err(e) => Ok(Outcome::Output(format!("{e}\n{HELP}"))),
        }
    }

    async fn run(&mut self, command: ShellCommand) -> Result<Outcome, ClientError> {
        let result = match command {
            ShellCommand::Login { name, level, exp } => {
                let player = PlayerInfo::new(name.clone()).with_progress(level, exp);
                self.client.add_player(&player).await.map(|()| {
                    let output = format!("{name} logged in.");
                    self.current = Some(name);
                    output
                })
            }
            ShellCommand::Logout { name } => {
                self.client.remove_player(&name).await.map(|()| {
                    if self.current.as_deref() == Some(name.as_str()) {
                        self.current = None;
                    }
                    format!("{name} logged out.")
                })
            }
            ShellCommand::Send { content } => {
                let from = self.current.clone().unwrap_or_default();
                self.client
                    .broadcast(&Message::new(from, "", content))
                    .await
                    .map(|()| "Message sent.".to_string())
            }
            ShellCommand::ListPlayer => self.client.list_players().await.map(|players| {
                players
                    .iter()
                    .enumerate()
                    .map(|(i, p)| format!("{} : {} (level {}, exp {})", i + 1, p.name, p.level, p.exp))
                    .collect::<Vec<_>>()
                    .join("\n")
            }),
            ShellCommand::Help => Ok(HELP.to_string()),
            ShellCommand::Quit => return Ok(Outcome::Quit),
        };

        match result {
            Ok(output) => Ok(Outcome::Output(output)),
            Err(ClientError::Rejected { code, .. }) => Ok(Outcome::Output(format!("Failed: {code}"))),
            Err(e) => Err(e),
        }
    }
}
