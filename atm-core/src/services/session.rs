//! Session - the screen flow of one ATM user
//!
//! ```text
//! LoggedOut --SubmitPin(known)--> Dashboard
//! LoggedOut --SubmitPin(new)--> ConfirmCreate --Confirm(yes)--> Dashboard
//!                                             --Confirm(no)---> LoggedOut
//! Dashboard --CheckBalance|Deposit|Withdraw|ShowHistory|ChangePin--> Dashboard
//! Dashboard --DeleteAccount--> ConfirmDelete --Confirm(yes)--> LoggedOut
//!                                            --Confirm(no)---> Dashboard
//! Dashboard --Logout--> LoggedOut
//! ```
//!
//! Every command either succeeds with a `Notice` for the user or fails with
//! an error, in which case neither the screen nor the store changes.

use rust_decimal::Decimal;
use serde::Serialize;

use crate::domain::parse_amount;
use crate::domain::result::{Error, Result};
use crate::domain::Pin;
use crate::services::store::{AccountStore, Authentication};

/// Where the session currently is
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Screen {
    LoggedOut,
    /// PIN not found; waiting for the user to accept account creation
    ConfirmCreate(Pin),
    Dashboard(Pin),
    /// Waiting for the user to confirm account deletion
    ConfirmDelete(Pin),
}

impl Screen {
    /// Short name, safe to log
    pub fn name(&self) -> &'static str {
        match self {
            Screen::LoggedOut => "logged_out",
            Screen::ConfirmCreate(_) => "confirm_create",
            Screen::Dashboard(_) => "dashboard",
            Screen::ConfirmDelete(_) => "confirm_delete",
        }
    }
}

/// A discrete user action
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    SubmitPin(String),
    Confirm(bool),
    CheckBalance,
    Deposit(String),
    Withdraw(String),
    ShowHistory,
    ChangePin(String),
    DeleteAccount,
    Logout,
}

impl Command {
    /// Short name, safe to log (never includes the typed input)
    pub fn name(&self) -> &'static str {
        match self {
            Command::SubmitPin(_) => "submit_pin",
            Command::Confirm(_) => "confirm",
            Command::CheckBalance => "check_balance",
            Command::Deposit(_) => "deposit",
            Command::Withdraw(_) => "withdraw",
            Command::ShowHistory => "show_history",
            Command::ChangePin(_) => "change_pin",
            Command::DeleteAccount => "delete_account",
            Command::Logout => "logout",
        }
    }
}

/// What the user should be told after a successful command
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "notice", rename_all = "snake_case")]
pub enum Notice {
    LoggedIn { pin: String },
    CreatePrompt { pin: String },
    AccountCreated { pin: String },
    Balance { balance: Decimal },
    Deposited { amount: Decimal, balance: Decimal },
    Withdrew { amount: Decimal, balance: Decimal },
    History { entries: Vec<String> },
    PinChanged { pin: String },
    DeletePrompt,
    AccountDeleted,
    LoggedOut,
    Cancelled,
}

/// One interactive session over an account store
pub struct Session {
    store: AccountStore,
    screen: Screen,
}

impl Session {
    pub fn new(store: AccountStore) -> Self {
        Self {
            store,
            screen: Screen::LoggedOut,
        }
    }

    pub fn screen(&self) -> &Screen {
        &self.screen
    }

    /// PIN of the logged-in user, if any
    pub fn current_user(&self) -> Option<&Pin> {
        match &self.screen {
            Screen::LoggedOut => None,
            Screen::ConfirmCreate(_) => None,
            Screen::Dashboard(pin) | Screen::ConfirmDelete(pin) => Some(pin),
        }
    }

    pub fn store(&self) -> &AccountStore {
        &self.store
    }

    /// Give the store back, ending the session
    pub fn into_store(self) -> AccountStore {
        self.store
    }

    /// Apply one command to the current screen
    pub fn handle(&mut self, command: Command) -> Result<Notice> {
        let (next, notice) = match (&self.screen, command) {
            (Screen::LoggedOut, Command::SubmitPin(input)) => {
                match self.store.authenticate(&input)? {
                    Authentication::Existing(pin) => {
                        let notice = Notice::LoggedIn { pin: pin.to_string() };
                        (Screen::Dashboard(pin), notice)
                    }
                    Authentication::New(pin) => {
                        let notice = Notice::CreatePrompt { pin: pin.to_string() };
                        (Screen::ConfirmCreate(pin), notice)
                    }
                }
            }

            (Screen::ConfirmCreate(pin), Command::Confirm(true)) => {
                let pin = pin.clone();
                self.store.create(&pin)?;
                let notice = Notice::AccountCreated { pin: pin.to_string() };
                (Screen::Dashboard(pin), notice)
            }
            (Screen::ConfirmCreate(_), Command::Confirm(false)) => {
                (Screen::LoggedOut, Notice::Cancelled)
            }

            (Screen::Dashboard(pin), Command::CheckBalance) => {
                let balance = self.store.balance(pin)?;
                (self.screen.clone(), Notice::Balance { balance })
            }
            (Screen::Dashboard(pin), Command::Deposit(input)) => {
                let pin = pin.clone();
                let amount = parse_amount(&input)?;
                let balance = self.store.deposit(&pin, amount)?;
                (Screen::Dashboard(pin), Notice::Deposited { amount, balance })
            }
            (Screen::Dashboard(pin), Command::Withdraw(input)) => {
                let pin = pin.clone();
                let amount = parse_amount(&input)?;
                let balance = self.store.withdraw(&pin, amount)?;
                (Screen::Dashboard(pin), Notice::Withdrew { amount, balance })
            }
            (Screen::Dashboard(pin), Command::ShowHistory) => {
                let entries = self.store.history(pin)?.to_vec();
                (self.screen.clone(), Notice::History { entries })
            }
            (Screen::Dashboard(pin), Command::ChangePin(input)) => {
                let old = pin.clone();
                let new = self.store.rename(&old, &input)?;
                let notice = Notice::PinChanged { pin: new.to_string() };
                (Screen::Dashboard(new), notice)
            }
            (Screen::Dashboard(pin), Command::DeleteAccount) => {
                (Screen::ConfirmDelete(pin.clone()), Notice::DeletePrompt)
            }
            (Screen::Dashboard(_), Command::Logout) => (Screen::LoggedOut, Notice::LoggedOut),

            (Screen::ConfirmDelete(pin), Command::Confirm(true)) => {
                let pin = pin.clone();
                self.store.delete(&pin)?;
                (Screen::LoggedOut, Notice::AccountDeleted)
            }
            (Screen::ConfirmDelete(pin), Command::Confirm(false)) => {
                (Screen::Dashboard(pin.clone()), Notice::Cancelled)
            }

            (screen, command) => {
                return Err(Error::invalid_state(format!(
                    "{} on {}",
                    command.name(),
                    screen.name()
                )));
            }
        };

        self.screen = next;
        Ok(notice)
    }
}
