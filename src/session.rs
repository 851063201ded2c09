// Swaptile – A picture swapping puzzle
// Copyright (C) 2024  Neil Roberts
//
// This program is free software: you can redistribute it and/or modify
// it under the terms of the GNU General Public License as published by
// the Free Software Foundation, either version 3 of the License, or
// (at your option) any later version.
//
// This program is distributed in the hope that it will be useful,
// but WITHOUT ANY WARRANTY; without even the implied warranty of
// MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE.  See the
// GNU General Public License for more details.
//
// You should have received a copy of the GNU General Public License
// along with this program.  If not, see <http://www.gnu.org/licenses/>.

use super::geometry::Geometry;
use super::puzzle::{Puzzle, TileId};

#[derive(Debug, PartialEq, Eq, thiserror::Error)]
pub enum Error {
    #[error("a {puzzle}×{puzzle} puzzle can’t be laid out on a {geometry}×{geometry} grid")]
    GridSizeMismatch { geometry: u32, puzzle: u32 },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DropResult {
    Cancelled,
    Swapped { solved: bool },
}

// Everything belonging to one loaded image. Loading another image
// replaces the whole session. The bitmap is whatever the front end
// draws the tiles from.
pub struct PuzzleSession<B> {
    id: u64,
    bitmap: B,
    geometry: Geometry,
    puzzle: Puzzle,
    drag_source: Option<TileId>,
}

impl<B> PuzzleSession<B> {
    pub fn new(
        id: u64,
        bitmap: B,
        geometry: Geometry,
        puzzle: Puzzle,
    ) -> Result<PuzzleSession<B>, Error> {
        if geometry.grid_size() != puzzle.grid_size() {
            return Err(Error::GridSizeMismatch {
                geometry: geometry.grid_size(),
                puzzle: puzzle.grid_size(),
            });
        }

        Ok(PuzzleSession {
            id,
            bitmap,
            geometry,
            puzzle,
            drag_source: None,
        })
    }

    pub fn id(&self) -> u64 {
        self.id
    }

    pub fn bitmap(&self) -> &B {
        &self.bitmap
    }

    pub fn geometry(&self) -> &Geometry {
        &self.geometry
    }

    pub fn puzzle(&self) -> &Puzzle {
        &self.puzzle
    }

    pub fn puzzle_mut(&mut self) -> &mut Puzzle {
        &mut self.puzzle
    }

    fn tile_for_pixel(&self, x: f32, y: f32) -> Option<TileId> {
        let (cell_x, cell_y) = self.geometry.reverse_coords(x, y)?;

        self.puzzle.tile_at(cell_x, cell_y)
    }

    pub fn is_dragging(&self) -> bool {
        self.drag_source.is_some()
    }

    // Coordinates are in pixels of the working bitmap
    pub fn pointer_down(&mut self, x: f32, y: f32) {
        self.drag_source = self.tile_for_pixel(x, y);
    }

    pub fn pointer_up(&mut self, x: f32, y: f32) -> DropResult {
        let Some(source) = self.drag_source.take()
        else {
            return DropResult::Cancelled;
        };

        let Some(target) = self.tile_for_pixel(x, y)
        else {
            log::debug!("drag from tile {} dropped outside the grid", source);
            return DropResult::Cancelled;
        };

        match self.puzzle.swap(source, target) {
            Ok(()) => DropResult::Swapped { solved: self.puzzle.is_solved() },
            Err(e) => {
                log::debug!("{}", e);
                DropResult::Cancelled
            },
        }
    }

    pub fn pointer_cancel(&mut self) {
        self.drag_source = None;
    }
}
