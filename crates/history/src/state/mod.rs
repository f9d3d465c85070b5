pub mod edit;
pub mod figure;
pub mod history;
pub mod settings;

pub use edit::FigureFile;
pub use figure::{Document, Figure, LinkInfo, LinkMode};
pub use history::{HistoryRecord, HistoryStacks, Side, Status};
pub use settings::HistorySettings;

use history::{CaptureGuards, StagingArea};

use crate::error::HistoryError;
use crate::redisplay::{NullRedisplay, Redisplay};

/// One open figure with its history
pub struct EditorSession {
    pub figure: Figure,
    pub settings: HistorySettings,
    pub(crate) staging: StagingArea,
    pub(crate) stacks: HistoryStacks,
    pub(crate) guards: CaptureGuards,
    pub(crate) redisplay: Box<dyn Redisplay>,
    last_status: Option<Status>,
}

impl Default for EditorSession {
    fn default() -> Self {
        Self::with_redisplay(Box::new(NullRedisplay))
    }
}

impl EditorSession {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_redisplay(redisplay: Box<dyn Redisplay>) -> Self {
        Self {
            figure: Figure::new(),
            settings: HistorySettings::default(),
            staging: StagingArea::default(),
            stacks: HistoryStacks::default(),
            guards: CaptureGuards::default(),
            redisplay,
            last_status: None,
        }
    }

    pub fn with_settings(mut self, settings: HistorySettings) -> Self {
        self.settings = settings;
        self
    }

    pub fn history(&self) -> &HistoryStacks {
        &self.stacks
    }

    pub fn can_undo(&self) -> bool {
        !self.stacks.is_empty(Side::Undo)
    }

    pub fn can_redo(&self) -> bool {
        !self.stacks.is_empty(Side::Redo)
    }

    /// Message of the last undo or redo call
    pub fn last_status(&self) -> Option<&Status> {
        self.last_status.as_ref()
    }

    pub(crate) fn set_status(&mut self, status: Status) {
        self.last_status = Some(status);
    }

    /// Run sub-edits without recording them and without touching the redo
    /// stack. The previous guards are restored afterwards, even on error.
    pub fn replay<T>(
        &mut self,
        f: impl FnOnce(&mut Self) -> Result<T, HistoryError>,
    ) -> Result<T, HistoryError> {
        let saved = self.guards;
        self.guards = CaptureGuards {
            keep_redo: true,
            frozen: true,
        };
        let result = f(self);
        self.guards = saved;
        result
    }
}
