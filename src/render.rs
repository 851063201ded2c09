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
use super::puzzle::Puzzle;
use image::{imageops, Rgba, RgbaImage};

pub const BORDER_COLOR: Rgba<u8> = Rgba([0, 0, 0, 255]);

// Draws the tiles in their current positions the same way that the
// web page draws them on the canvas
pub fn render(
    puzzle: &Puzzle,
    geometry: &Geometry,
    bitmap: &RgbaImage,
) -> RgbaImage {
    assert_eq!(
        bitmap.dimensions(),
        (geometry.working_size(), geometry.working_size()),
    );

    let mut output = RgbaImage::new(
        geometry.working_size(),
        geometry.working_size(),
    );

    for tile in puzzle.tiles() {
        let (src_x, src_y) = tile.correct_position();
        let (dst_x, dst_y) = tile.current_position();

        draw_cell(
            &mut output,
            bitmap,
            geometry.cell_bounds(src_x, src_y),
            geometry.cell_bounds(dst_x, dst_y),
        );
    }

    output
}

fn draw_cell(
    output: &mut RgbaImage,
    bitmap: &RgbaImage,
    (src_x, src_y, src_width, src_height): (u32, u32, u32, u32),
    (dst_x, dst_y, dst_width, dst_height): (u32, u32, u32, u32),
) {
    let mut region = imageops::crop_imm(
        bitmap,
        src_x,
        src_y,
        src_width,
        src_height,
    ).to_image();

    // Cells can differ by a pixel when the size doesn’t divide evenly
    if (src_width, src_height) != (dst_width, dst_height) {
        region = imageops::resize(
            &region,
            dst_width,
            dst_height,
            imageops::FilterType::Triangle,
        );
    }

    imageops::replace(output, &region, dst_x as i64, dst_y as i64);

    let right = dst_x + dst_width - 1;
    let bottom = dst_y + dst_height - 1;

    for x in dst_x..=right {
        output.put_pixel(x, dst_y, BORDER_COLOR);
        output.put_pixel(x, bottom, BORDER_COLOR);
    }

    for y in dst_y..=bottom {
        output.put_pixel(dst_x, y, BORDER_COLOR);
        output.put_pixel(right, y, BORDER_COLOR);
    }
}

#[cfg(test)]
mod test {
    use super::*;

    // Each cell of the bitmap gets its own colour
    fn cell_colors(geometry: &Geometry) -> RgbaImage {
        RgbaImage::from_fn(
            geometry.working_size(),
            geometry.working_size(),
            |x, y| {
                let (cell_x, cell_y) =
                    geometry.reverse_coords(x as f32, y as f32).unwrap();
                Rgba([
                    cell_x as u8 * 50 + 10,
                    cell_y as u8 * 50 + 10,
                    128,
                    255,
                ])
            },
        )
    }

    fn cell_center(geometry: &Geometry, x: u32, y: u32) -> (u32, u32) {
        let (left, top, width, height) = geometry.cell_bounds(x, y);

        (left + width / 2, top + height / 2)
    }

    #[test]
    fn solved() {
        let geometry = Geometry::new(40, 4).unwrap();
        let bitmap = cell_colors(&geometry);
        let puzzle = Puzzle::new(4).unwrap();

        let output = render(&puzzle, &geometry, &bitmap);

        assert_eq!(output.dimensions(), (40, 40));

        for y in 1..9 {
            for x in 1..9 {
                assert_eq!(output.get_pixel(x, y), bitmap.get_pixel(x, y));
            }
        }

        // Borders on every side of the cell
        assert_eq!(*output.get_pixel(0, 5), BORDER_COLOR);
        assert_eq!(*output.get_pixel(9, 5), BORDER_COLOR);
        assert_eq!(*output.get_pixel(5, 0), BORDER_COLOR);
        assert_eq!(*output.get_pixel(5, 9), BORDER_COLOR);
        assert_eq!(*output.get_pixel(10, 5), BORDER_COLOR);
    }

    #[test]
    fn swapped() {
        let geometry = Geometry::new(40, 4).unwrap();
        let bitmap = cell_colors(&geometry);
        let mut puzzle = Puzzle::new(4).unwrap();

        let a = puzzle.tile_at(0, 0).unwrap();
        let b = puzzle.tile_at(2, 3).unwrap();
        puzzle.swap(a, b).unwrap();

        let output = render(&puzzle, &geometry, &bitmap);

        let (x, y) = cell_center(&geometry, 2, 3);
        let (orig_x, orig_y) = cell_center(&geometry, 0, 0);
        assert_eq!(output.get_pixel(x, y), bitmap.get_pixel(orig_x, orig_y));

        let (x, y) = cell_center(&geometry, 0, 0);
        let (orig_x, orig_y) = cell_center(&geometry, 2, 3);
        assert_eq!(output.get_pixel(x, y), bitmap.get_pixel(orig_x, orig_y));

        // Untouched cell
        let (x, y) = cell_center(&geometry, 1, 1);
        assert_eq!(output.get_pixel(x, y), bitmap.get_pixel(x, y));
    }

    #[test]
    fn uneven_cells() {
        let geometry = Geometry::new(10, 3).unwrap();
        let bitmap = RgbaImage::from_pixel(10, 10, Rgba([1, 2, 3, 255]));
        let mut puzzle = Puzzle::new(3).unwrap();

        // Moves a 3×3 tile into a 4×4 cell
        let a = puzzle.tile_at(0, 0).unwrap();
        let b = puzzle.tile_at(2, 2).unwrap();
        puzzle.swap(a, b).unwrap();

        let output = render(&puzzle, &geometry, &bitmap);

        assert_eq!(*output.get_pixel(7, 7), Rgba([1, 2, 3, 255]));
        assert_eq!(*output.get_pixel(9, 9), BORDER_COLOR);
        assert_eq!(*output.get_pixel(6, 8), BORDER_COLOR);
    }
}
