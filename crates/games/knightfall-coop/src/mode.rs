use serde::{Deserialize, Serialize};

use knightfall_core::game_trait::SessionOutcome;

/// Which logic runs each tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Mode {
    Intro,
    Menu,
    ActivePlay,
    Paused,
    Victory,
    Defeat,
}

/// Sub-page shown while in [`Mode::Menu`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MenuPage {
    Main,
    HowToPlay,
    Characters,
    Credits,
}

/// Navigation intent from the host.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MenuInput {
    Up,
    Down,
    Confirm,
    Cancel,
}

/// Main menu entries, in cursor order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MainMenuItem {
    Start,
    HowToPlay,
    Characters,
    Credits,
}

impl MainMenuItem {
    pub const ALL: [MainMenuItem; 4] = [
        MainMenuItem::Start,
        MainMenuItem::HowToPlay,
        MainMenuItem::Characters,
        MainMenuItem::Credits,
    ];
}

/// Pause menu entries, in cursor order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PauseItem {
    Resume,
    MainMenu,
    Quit,
}

impl PauseItem {
    pub const ALL: [PauseItem; 3] = [PauseItem::Resume, PauseItem::MainMenu, PauseItem::Quit];
}

/// Side effect the orchestrator must perform after a transition.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ModeCommand {
    /// Input was ignored or only moved the cursor.
    None,
    /// Reset counters and entities, then run active play.
    StartSession,
    /// Abandon the session in progress and reset it.
    AbandonSession,
    /// Like `AbandonSession`, and tell the host the player asked to quit.
    Quit,
    /// Victory or defeat acknowledged: reset counters.
    ResetScores,
}

/// Current mode plus menu navigation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModeState {
    pub mode: Mode,
    pub page: MenuPage,
    /// Cursor into the main or pause menu, depending on mode.
    pub cursor: usize,
}

impl Default for ModeState {
    fn default() -> Self {
        Self {
            mode: Mode::Intro,
            page: MenuPage::Main,
            cursor: 0,
        }
    }
}

fn wrap(cursor: usize, len: usize, input: MenuInput) -> usize {
    match input {
        MenuInput::Up => (cursor + len - 1) % len,
        MenuInput::Down => (cursor + 1) % len,
        _ => cursor,
    }
}

impl ModeState {
    /// Apply one navigation input. Inputs that mean nothing in the current
    /// mode are ignored.
    pub fn handle(&mut self, input: MenuInput) -> ModeCommand {
        match (self.mode, input) {
            (Mode::Intro, MenuInput::Confirm) => {
                self.enter_menu();
                ModeCommand::None
            },
            (Mode::Victory | Mode::Defeat, MenuInput::Confirm) => {
                self.enter_menu();
                ModeCommand::ResetScores
            },
            (Mode::Menu, MenuInput::Cancel) => {
                self.page = MenuPage::Main;
                ModeCommand::None
            },
            (Mode::Menu, MenuInput::Up | MenuInput::Down) if self.page == MenuPage::Main => {
                self.cursor = wrap(self.cursor, MainMenuItem::ALL.len(), input);
                ModeCommand::None
            },
            (Mode::Menu, MenuInput::Confirm) if self.page == MenuPage::Main => {
                self.confirm_main()
            },
            (Mode::ActivePlay, MenuInput::Cancel) => {
                self.mode = Mode::Paused;
                self.cursor = 0;
                ModeCommand::None
            },
            (Mode::Paused, MenuInput::Cancel) => {
                self.mode = Mode::ActivePlay;
                ModeCommand::None
            },
            (Mode::Paused, MenuInput::Up | MenuInput::Down) => {
                self.cursor = wrap(self.cursor, PauseItem::ALL.len(), input);
                ModeCommand::None
            },
            (Mode::Paused, MenuInput::Confirm) => self.confirm_pause(),
            _ => ModeCommand::None,
        }
    }

    /// Forced end of active play. Ignored outside active play.
    pub fn end_session(&mut self, outcome: SessionOutcome) -> bool {
        if self.mode != Mode::ActivePlay {
            return false;
        }
        self.mode = match outcome {
            SessionOutcome::Victory => Mode::Victory,
            SessionOutcome::Defeat => Mode::Defeat,
            SessionOutcome::Abandoned => {
                self.page = MenuPage::Main;
                self.cursor = 0;
                Mode::Menu
            },
        };
        true
    }

    pub fn is_active(&self) -> bool {
        self.mode == Mode::ActivePlay
    }

    pub fn selected_main_item(&self) -> Option<MainMenuItem> {
        MainMenuItem::ALL.get(self.cursor).copied()
    }

    pub fn selected_pause_item(&self) -> Option<PauseItem> {
        PauseItem::ALL.get(self.cursor).copied()
    }

    fn enter_menu(&mut self) {
        self.mode = Mode::Menu;
        self.page = MenuPage::Main;
        self.cursor = 0;
    }

    fn confirm_main(&mut self) -> ModeCommand {
        match self.selected_main_item() {
            Some(MainMenuItem::Start) => {
                self.mode = Mode::ActivePlay;
                ModeCommand::StartSession
            },
            Some(MainMenuItem::HowToPlay) => {
                self.page = MenuPage::HowToPlay;
                ModeCommand::None
            },
            Some(MainMenuItem::Characters) => {
                self.page = MenuPage::Characters;
                ModeCommand::None
            },
            Some(MainMenuItem::Credits) => {
                self.page = MenuPage::Credits;
                ModeCommand::None
            },
            None => ModeCommand::None,
        }
    }

    fn confirm_pause(&mut self) -> ModeCommand {
        match self.selected_pause_item() {
            Some(PauseItem::Resume) => {
                self.mode = Mode::ActivePlay;
                ModeCommand::None
            },
            Some(PauseItem::MainMenu) => {
                self.enter_menu();
                ModeCommand::AbandonSession
            },
            Some(PauseItem::Quit) => {
                self.enter_menu();
                ModeCommand::Quit
            },
            None => ModeCommand::None,
        }
    }
}
