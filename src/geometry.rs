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

// Side length in pixels of the square bitmap that the puzzle is cut from
pub const WORKING_SIZE: u32 = 512;
// Number of tiles along each side of the puzzle
pub const GRID_SIZE: u32 = 4;

#[derive(Debug, PartialEq, Eq, thiserror::Error)]
pub enum Error {
    #[error("the grid size must be at least 1")]
    ZeroGridSize,
    #[error("a {grid_size}×{grid_size} grid doesn’t fit in {working_size} pixels")]
    TilesTooSmall {
        grid_size: u32,
        working_size: u32,
    },
}

// Maps between cells of the grid and pixels of the working bitmap
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Geometry {
    working_size: u32,
    grid_size: u32,
}

impl Default for Geometry {
    fn default() -> Geometry {
        Geometry {
            working_size: WORKING_SIZE,
            grid_size: GRID_SIZE,
        }
    }
}

impl Geometry {
    pub fn new(working_size: u32, grid_size: u32) -> Result<Geometry, Error> {
        if grid_size < 1 {
            Err(Error::ZeroGridSize)
        } else if grid_size > working_size {
            Err(Error::TilesTooSmall { grid_size, working_size })
        } else {
            Ok(Geometry { working_size, grid_size })
        }
    }

    pub fn working_size(&self) -> u32 {
        self.working_size
    }

    pub fn grid_size(&self) -> u32 {
        self.grid_size
    }

    // Pixel position of the left or top edge of a column or row. When
    // the working size isn’t a multiple of the grid size the tiles
    // differ in size by at most one pixel.
    fn edge(&self, index: u32) -> u32 {
        (index as u64 * self.working_size as u64 / self.grid_size as u64)
            as u32
    }

    // Returns the rectangle covered by a cell as (x, y, width, height)
    pub fn cell_bounds(&self, x: u32, y: u32) -> (u32, u32, u32, u32) {
        let left = self.edge(x);
        let top = self.edge(y);

        (left, top, self.edge(x + 1) - left, self.edge(y + 1) - top)
    }

    // Inverse of edge(): the last column or row whose edge is at or
    // before the pixel
    fn index_for_pixel(&self, pixel: u32) -> u32 {
        let index = ((pixel as u64 + 1) * self.grid_size as u64 - 1)
            / self.working_size as u64;

        (index as u32).min(self.grid_size - 1)
    }

    // Return the cell that covers the given pixel, if there is one
    pub fn reverse_coords(&self, x: f32, y: f32) -> Option<(u32, u32)> {
        let size = self.working_size as f32;

        if !(0.0..size).contains(&x) || !(0.0..size).contains(&y) {
            return None;
        }

        Some((
            self.index_for_pixel(x as u32),
            self.index_for_pixel(y as u32),
        ))
    }
}
