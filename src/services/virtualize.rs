//! Fönster över översiktens rader för virtuell scrollning

use serde::{Deserialize, Serialize};

pub const DEFAULT_ROW_HEIGHT: u32 = 56;
pub const DEFAULT_OVERSCAN: usize = 8;
pub const DEFAULT_CONTAINER_HEIGHT: u32 = 400;

/// Synligt område i pixlar
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Viewport {
    pub row_height: u32,
    /// 0 betyder okänd höjd och ersätts med standardhöjden
    pub container_height: u32,
    pub scroll_offset: u32,
    /// Extra rader ovanför och under det synliga området
    pub overscan: usize,
}

impl Default for Viewport {
    fn default() -> Self {
        Self {
            row_height: DEFAULT_ROW_HEIGHT,
            container_height: DEFAULT_CONTAINER_HEIGHT,
            scroll_offset: 0,
            overscan: DEFAULT_OVERSCAN,
        }
    }
}

/// Halvöppet radintervall `[start, end)` plus utfyllnad ovan och under
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct RowWindow {
    pub start: usize,
    pub end: usize,
    pub top_spacer: u64,
    pub bottom_spacer: u64,
}

impl RowWindow {
    pub fn len(&self) -> usize {
        self.end - self.start
    }

    pub fn is_empty(&self) -> bool {
        self.start == self.end
    }
}

impl Viewport {
    pub fn new(row_height: u32, container_height: u32) -> Self {
        Self {
            row_height,
            container_height,
            ..Default::default()
        }
    }

    pub fn with_scroll(mut self, scroll_offset: u32) -> Self {
        self.scroll_offset = scroll_offset;
        self
    }

    pub fn with_overscan(mut self, overscan: usize) -> Self {
        self.overscan = overscan;
        self
    }

    fn row_height(&self) -> u64 {
        u64::from(self.row_height.max(1))
    }

    fn container_height(&self) -> u64 {
        match self.container_height {
            0 => u64::from(DEFAULT_CONTAINER_HEIGHT),
            h => u64::from(h),
        }
    }

    /// Vilka av `total` rader som ska renderas
    pub fn window(&self, total: usize) -> RowWindow {
        let row_height = self.row_height();
        let scroll = u64::from(self.scroll_offset);
        let overscan = self.overscan as u64;
        let total_rows = total as u64;

        let first = scroll / row_height;
        let last = (scroll + self.container_height()).div_ceil(row_height);

        let end = last.saturating_add(overscan).min(total_rows);
        let start = first.saturating_sub(overscan).min(end);

        RowWindow {
            start: start as usize,
            end: end as usize,
            top_spacer: start * row_height,
            bottom_spacer: (total_rows - end) * row_height,
        }
    }

    /// Scrollposition som visar raden överst
    pub fn scroll_to_row(&self, row: usize) -> u32 {
        let offset = (row as u64).saturating_mul(self.row_height());
        u32::try_from(offset).unwrap_or(u32::MAX)
    }
}
