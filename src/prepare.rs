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

#[derive(Debug, PartialEq, Eq, thiserror::Error)]
pub enum Error {
    #[error("invalid image of size {width}×{height}")]
    InvalidImage {
        width: u32,
        height: u32,
    },
}

// The largest square in the middle of an image
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SquareCrop {
    pub x: u32,
    pub y: u32,
    pub side: u32,
}

pub fn square_crop(width: u32, height: u32) -> Result<SquareCrop, Error> {
    if width == 0 || height == 0 {
        return Err(Error::InvalidImage { width, height });
    }

    let side = width.min(height);

    Ok(SquareCrop {
        x: (width - side) / 2,
        y: (height - side) / 2,
        side,
    })
}

// Crops the image to a square and scales it to the working size
#[cfg(not(target_arch = "wasm32"))]
pub fn prepare(
    image: &image::DynamicImage,
    working_size: u32,
) -> Result<image::RgbaImage, Error> {
    let crop = square_crop(image.width(), image.height())?;

    Ok(
        image.crop_imm(crop.x, crop.y, crop.side, crop.side)
            .resize_exact(
                working_size,
                working_size,
                image::imageops::FilterType::Triangle,
            )
            .to_rgba8()
    )
}
