//! Test doubles for the panel

use alloc::vec;
use alloc::vec::Vec;

use embedded_graphics::pixelcolor::BinaryColor;
use embedded_graphics::prelude::*;
use embedded_graphics::primitives::{PointsIter, Rectangle};

use crate::traits::EpaperPanel;

/// Kind of update pushed to the glass
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Commit {
    Full,
    Partial(Rectangle),
}

/// One commit and the pixels written since the previous one
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CommitRecord {
    pub kind: Commit,
    /// Bounding box of every pixel written, ink or paper
    pub painted: Option<Rectangle>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PanelFault;

/// Frame-buffer panel that records what was drawn and committed
pub struct RecordingPanel {
    size: Size,
    ink: Vec<bool>,
    painted: Option<(Point, Point)>,
    pub clears: usize,
    pub commits: Vec<CommitRecord>,
    pub fail_commits: bool,
}

impl RecordingPanel {
    pub fn new(size: Size) -> Self {
        Self {
            size,
            ink: vec![false; (size.width * size.height) as usize],
            painted: None,
            clears: 0,
            commits: Vec::new(),
            fail_commits: false,
        }
    }

    /// Inked pixels inside `area`
    pub fn ink_in(&self, area: &Rectangle) -> usize {
        area.points().filter(|p| self.is_inked(*p)).count()
    }

    pub fn is_inked(&self, p: Point) -> bool {
        self.index(p).is_some_and(|i| self.ink[i])
    }

    pub fn full_commits(&self) -> usize {
        self.commits
            .iter()
            .filter(|c| c.kind == Commit::Full)
            .count()
    }

    pub fn partial_commits(&self) -> Vec<Rectangle> {
        self.commits
            .iter()
            .filter_map(|c| match c.kind {
                Commit::Partial(area) => Some(area),
                Commit::Full => None,
            })
            .collect()
    }

    fn index(&self, p: Point) -> Option<usize> {
        if p.x < 0 || p.y < 0 || p.x as u32 >= self.size.width || p.y as u32 >= self.size.height {
            return None;
        }
        Some(p.y as usize * self.size.width as usize + p.x as usize)
    }

    fn mark_painted(&mut self, p: Point) {
        self.painted = Some(match self.painted {
            None => (p, p),
            Some((min, max)) => (min.component_min(p), max.component_max(p)),
        });
    }

    fn record(&mut self, kind: Commit) -> Result<(), PanelFault> {
        if self.fail_commits {
            return Err(PanelFault);
        }
        let painted = self
            .painted
            .take()
            .map(|(min, max)| Rectangle::with_corners(min, max));
        self.commits.push(CommitRecord { kind, painted });
        Ok(())
    }
}

impl OriginDimensions for RecordingPanel {
    fn size(&self) -> Size {
        self.size
    }
}

impl DrawTarget for RecordingPanel {
    type Color = BinaryColor;
    type Error = PanelFault;

    fn draw_iter<I>(&mut self, pixels: I) -> Result<(), Self::Error>
    where
        I: IntoIterator<Item = Pixel<Self::Color>>,
    {
        for Pixel(point, color) in pixels {
            if let Some(i) = self.index(point) {
                self.ink[i] = color.is_on();
                self.mark_painted(point);
            }
        }
        Ok(())
    }

    fn clear(&mut self, color: Self::Color) -> Result<(), Self::Error> {
        self.clears += 1;
        self.ink.fill(color.is_on());
        let bounds = self.bounding_box();
        if let Some(bottom_right) = bounds.bottom_right() {
            self.mark_painted(bounds.top_left);
            self.mark_painted(bottom_right);
        }
        Ok(())
    }
}

impl EpaperPanel for RecordingPanel {
    fn commit_full(&mut self) -> Result<(), Self::Error> {
        self.record(Commit::Full)
    }

    fn commit_partial(&mut self, area: Rectangle) -> Result<(), Self::Error> {
        self.record(Commit::Partial(area))
    }
}

/// Whether `inner` lies entirely within `outer`
pub fn within(inner: &Rectangle, outer: &Rectangle) -> bool {
    match inner.bottom_right() {
        Some(bottom_right) => outer.contains(inner.top_left) && outer.contains(bottom_right),
        None => true,
    }
}
