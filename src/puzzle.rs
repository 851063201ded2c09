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

use rand::Rng;

// Index into the list of tiles. The tiles are created in row-major
// order so the tile that belongs at (x, y) has the id
// y * grid_size + x.
pub type TileId = usize;

#[derive(Debug, PartialEq, Eq, thiserror::Error)]
pub enum Error {
    #[error("empty grid")]
    EmptyGrid,
    #[error("invalid swap between tiles {0} and {1}")]
    InvalidSwap(TileId, TileId),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Tile {
    correct_position: (u32, u32),
    current_position: (u32, u32),
}

impl Tile {
    // The part of the image that this tile shows
    pub fn correct_position(&self) -> (u32, u32) {
        self.correct_position
    }

    // Where the tile is currently drawn
    pub fn current_position(&self) -> (u32, u32) {
        self.current_position
    }

    pub fn is_in_place(&self) -> bool {
        self.correct_position == self.current_position
    }
}

pub struct Puzzle {
    grid_size: u32,
    tiles: Box<[Tile]>,
    cells_dirty: Vec<bool>,
}

impl Puzzle {
    pub fn new(grid_size: u32) -> Result<Puzzle, Error> {
        if grid_size < 1 {
            return Err(Error::EmptyGrid);
        }

        let tiles = (0..grid_size)
            .map(|y| (0..grid_size).map(move |x| (x, y)))
            .flatten()
            .map(|position| Tile {
                correct_position: position,
                current_position: position,
            })
            .collect::<Vec<_>>()
            .into_boxed_slice();

        let cells_dirty = vec![true; tiles.len()];

        Ok(Puzzle {
            grid_size,
            tiles,
            cells_dirty,
        })
    }

    pub fn grid_size(&self) -> u32 {
        self.grid_size
    }

    pub fn tiles(&self) -> &[Tile] {
        &self.tiles
    }

    pub fn tile(&self, id: TileId) -> Option<&Tile> {
        self.tiles.get(id)
    }

    // Fisher–Yates shuffle of the current positions. The correct
    // positions never move.
    pub fn shuffle<R: Rng + ?Sized>(&mut self, rng: &mut R) {
        for i in (1..self.tiles.len()).rev() {
            let j = rng.gen_range(0..=i);

            let current = self.tiles[i].current_position;
            self.tiles[i].current_position = self.tiles[j].current_position;
            self.tiles[j].current_position = current;
        }

        self.cells_dirty.fill(true);

        log::debug!(
            "shuffled {} tiles, {} left in place",
            self.tiles.len(),
            self.tiles.iter().filter(|tile| tile.is_in_place()).count(),
        );
    }

    // Shuffle until at least one tile is out of place. A grid with
    // only one tile can’t be anything but solved so it is shuffled
    // once and left alone.
    pub fn shuffle_unsolved<R: Rng + ?Sized>(&mut self, rng: &mut R) {
        loop {
            self.shuffle(rng);

            if self.tiles.len() < 2 || !self.is_solved() {
                break;
            }

            log::debug!("shuffle produced a solved grid, trying again");
        }
    }

    pub fn tile_at(&self, x: u32, y: u32) -> Option<TileId> {
        if x >= self.grid_size || y >= self.grid_size {
            return None;
        }

        self.tiles.iter().position(|tile| tile.current_position == (x, y))
    }

    pub fn swap(&mut self, a: TileId, b: TileId) -> Result<(), Error> {
        if a == b || a >= self.tiles.len() || b >= self.tiles.len() {
            return Err(Error::InvalidSwap(a, b));
        }

        let pos_a = self.tiles[a].current_position;
        let pos_b = self.tiles[b].current_position;

        self.tiles[a].current_position = pos_b;
        self.tiles[b].current_position = pos_a;

        self.dirty_cell(pos_a);
        self.dirty_cell(pos_b);

        log::debug!("swapped {:?} and {:?}", pos_a, pos_b);

        Ok(())
    }

    pub fn is_solved(&self) -> bool {
        self.tiles.iter().all(Tile::is_in_place)
    }

    fn dirty_cell(&mut self, (x, y): (u32, u32)) {
        self.cells_dirty[(y * self.grid_size + x) as usize] = true;
    }

    pub fn changed_cells(&mut self) -> ChangedCells {
        let n_cells = self.cells_dirty.len();

        ChangedCells::new(
            self.grid_size,
            std::mem::replace(&mut self.cells_dirty, vec![false; n_cells]),
        )
    }
}

pub struct ChangedCells {
    grid_size: u32,
    cells_dirty: Vec<bool>,
    pos: usize,
}

impl ChangedCells {
    fn new(grid_size: u32, cells_dirty: Vec<bool>) -> ChangedCells {
        ChangedCells {
            grid_size,
            cells_dirty,
            pos: 0,
        }
    }
}

impl Iterator for ChangedCells {
    type Item = (u32, u32);

    fn next(&mut self) -> Option<(u32, u32)> {
        let offset = self.cells_dirty.get(self.pos..)?
            .iter()
            .position(|&dirty| dirty)?;
        let index = self.pos + offset;

        self.pos = index + 1;

        Some((
            index as u32 % self.grid_size,
            index as u32 / self.grid_size,
        ))
    }
}
