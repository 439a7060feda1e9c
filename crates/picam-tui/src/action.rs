//! Action enum — all user-initiated intents.

use picam_proto::protocol::ConfigUpdate;

/// Unique identifier for a focusable component.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ComponentId {
    EpisodeList,
    EventList,
    ConfigForm,
    LogPanel,
}

/// Components produce Actions; the App dispatches them.
#[derive(Debug, Clone, PartialEq)]
pub enum Action {
    // ── Navigation ───────────────────────────────────────────────────────────
    FocusNext,
    FocusPrev,
    FocusPane(ComponentId),

    // ── Config form ──────────────────────────────────────────────────────────
    SubmitConfig(ConfigUpdate),
    /// The form could not build a request; carries the reason shown to the user.
    ConfigRejected(String),

    // ── System ───────────────────────────────────────────────────────────────
    Refresh,
    ToggleLogs,
    DismissNotice,
    Quit,
}
