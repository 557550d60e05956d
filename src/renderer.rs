use std::io::Write;

use crate::error::Result;
use crate::grid::Grid;

const ALIVE_GLYPH: char = '#';
const DEAD_GLYPH: char = '.';

/// Everything a renderer may read for one redraw.
#[derive(Debug, Clone, Copy)]
pub struct Frame<'a> {
    pub generation: u64,
    pub population: u64,
    pub grid: &'a Grid,
}

/// Presentation seam: receives committed grid state and the one-shot
/// stability notice.
pub trait Renderer {
    fn draw(&mut self, frame: &Frame<'_>) -> Result<()>;

    fn announce_stability(&mut self, onset: u64) -> Result<()>;
}

/// Plain-text renderer writing `#`/`.` rows followed by a status line.
///
/// A generation is written once; repeated frames of a paused run are skipped.
pub struct TextRenderer<W: Write> {
    out: W,
    show_grid: bool,
    last_generation: Option<u64>,
}

impl<W: Write> TextRenderer<W> {
    pub fn new(out: W) -> Self {
        Self {
            out,
            show_grid: true,
            last_generation: None,
        }
    }

    /// Only print status lines.
    pub fn status_only(out: W) -> Self {
        Self {
            out,
            show_grid: false,
            last_generation: None,
        }
    }

    pub fn into_inner(self) -> W {
        self.out
    }
}

impl<W: Write> Renderer for TextRenderer<W> {
    fn draw(&mut self, frame: &Frame<'_>) -> Result<()> {
        if self.last_generation == Some(frame.generation) {
            return Ok(());
        }
        self.last_generation = Some(frame.generation);

        if self.show_grid {
            let last = frame.grid.size() - 1;
            for row in frame.grid.rows().skip(1).take(last - 1) {
                let line: String = row[1..last]
                    .iter()
                    .map(|cell| if cell.is_alive() { ALIVE_GLYPH } else { DEAD_GLYPH })
                    .collect();
                writeln!(self.out, "{line}")?;
            }
        }
        writeln!(
            self.out,
            "generation {} | live {}",
            frame.generation, frame.population
        )?;
        self.out.flush()?;
        Ok(())
    }

    fn announce_stability(&mut self, onset: u64) -> Result<()> {
        writeln!(self.out, "stability reached: grid stagnates from generation {onset}")?;
        self.out.flush()?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grid::pattern_blinker;

    fn blinker_grid() -> Grid {
        let mut grid = Grid::new(3).unwrap();
        grid.place_pattern(&pattern_blinker(), (2, 1)).unwrap();
        grid.commit_all();
        grid
    }

    #[test]
    fn test_draw_grid_and_status() {
        let grid = blinker_grid();
        let mut renderer = TextRenderer::new(Vec::new());
        renderer
            .draw(&Frame {
                generation: 4,
                population: grid.population(),
                grid: &grid,
            })
            .unwrap();
        let text = String::from_utf8(renderer.into_inner()).unwrap();
        assert_eq!(text, "...\n###\n...\ngeneration 4 | live 3\n");
    }

    #[test]
    fn test_status_only() {
        let grid = blinker_grid();
        let mut renderer = TextRenderer::status_only(Vec::new());
        renderer
            .draw(&Frame {
                generation: 0,
                population: 3,
                grid: &grid,
            })
            .unwrap();
        let text = String::from_utf8(renderer.into_inner()).unwrap();
        assert_eq!(text, "generation 0 | live 3\n");
    }

    #[test]
    fn test_repeated_generation_written_once() {
        let grid = blinker_grid();
        let mut renderer = TextRenderer::status_only(Vec::new());
        for generation in [5, 5, 5, 6] {
            renderer
                .draw(&Frame {
                    generation,
                    population: 3,
                    grid: &grid,
                })
                .unwrap();
        }
        let text = String::from_utf8(renderer.into_inner()).unwrap();
        assert_eq!(text, "generation 5 | live 3\ngeneration 6 | live 3\n");
    }

    #[test]
    fn test_announce_stability() {
        let mut renderer = TextRenderer::new(Vec::new());
        renderer.announce_stability(17).unwrap();
        let text = String::from_utf8(renderer.into_inner()).unwrap();
        assert!(text.contains("from generation 17"));
    }
}
