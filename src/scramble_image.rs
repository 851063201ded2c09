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

mod geometry;
mod prepare;
mod puzzle;
mod render;

use std::{process::ExitCode, ffi::OsString};
use clap::Parser;
use rand::SeedableRng;
use rand::rngs::StdRng;
use serde::Serialize;
use geometry::{Geometry, GRID_SIZE, WORKING_SIZE};
use puzzle::Puzzle;

#[derive(Parser)]
#[command(name = "Scramble image")]
struct Cli {
    #[arg(value_name = "IMAGE")]
    image: OsString,
    #[arg(short, long, value_name = "FILE")]
    output: OsString,
    #[arg(short, long, value_name = "TILES", default_value_t = GRID_SIZE)]
    grid_size: u32,
    #[arg(short, long, value_name = "PIXELS", default_value_t = WORKING_SIZE)]
    working_size: u32,
    #[arg(short, long)]
    seed: Option<u64>,
    #[arg(long)]
    solved: bool,
}

#[derive(Serialize)]
struct TileLayout {
    correct: (u32, u32),
    current: (u32, u32),
}

#[derive(Serialize)]
struct Layout {
    grid_size: u32,
    working_size: u32,
    seed: Option<u64>,
    solved: bool,
    tiles: Vec<TileLayout>,
}

impl Layout {
    fn new(puzzle: &Puzzle, geometry: &Geometry, seed: Option<u64>) -> Layout {
        Layout {
            grid_size: puzzle.grid_size(),
            working_size: geometry.working_size(),
            seed,
            solved: puzzle.is_solved(),
            tiles: puzzle.tiles().iter().map(|tile| TileLayout {
                correct: tile.correct_position(),
                current: tile.current_position(),
            }).collect(),
        }
    }
}

fn main() -> ExitCode {
    env_logger::init();

    let cli = Cli::parse();

    let geometry = match Geometry::new(cli.working_size, cli.grid_size) {
        Ok(g) => g,
        Err(e) => {
            eprintln!("{}", e);
            return ExitCode::FAILURE;
        },
    };

    let source = match image::open(&cli.image) {
        Ok(i) => i,
        Err(e) => {
            eprintln!("{}: {}", cli.image.to_string_lossy(), e);
            return ExitCode::FAILURE;
        },
    };

    let bitmap = match prepare::prepare(&source, geometry.working_size()) {
        Ok(b) => b,
        Err(e) => {
            eprintln!("{}: {}", cli.image.to_string_lossy(), e);
            return ExitCode::FAILURE;
        },
    };

    let mut puzzle = match Puzzle::new(geometry.grid_size()) {
        Ok(p) => p,
        Err(e) => {
            eprintln!("{}", e);
            return ExitCode::FAILURE;
        },
    };

    if !cli.solved {
        let mut rng = match cli.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };

        puzzle.shuffle_unsolved(&mut rng);
    }

    let output = render::render(&puzzle, &geometry, &bitmap);

    if let Err(e) = output.save(&cli.output) {
        eprintln!("{}: {}", cli.output.to_string_lossy(), e);
        return ExitCode::FAILURE;
    }

    let layout = Layout::new(&puzzle, &geometry, cli.seed);

    match serde_json::to_string(&layout) {
        Ok(json) => println!("{}", json),
        Err(e) => {
            eprintln!("{}", e);
            return ExitCode::FAILURE;
        },
    }

    ExitCode::SUCCESS
}
