use super::PaneSize;

/// Font size the fit starts shrinking from.
pub const LEGEND_START_SIZE: f32 = 100.0;
const SHRINK: f32 = 0.9;
const MIN_SIZE: f32 = 4.0;
/// Share of each line's vertical slot the text may fill.
const HEIGHT_SHARE: f32 = 0.7;
/// Share of one pane's width the widest line may take.
const WIDTH_SHARE: f32 = 0.2;

/// Font size and line placement for the legend drawn over the seam.
#[derive(Debug, Clone, PartialEq)]
pub struct LegendLayout {
    pub font_size: f32,
    pub line_height: f32,
    pub lines: Vec<String>,
}

impl LegendLayout {
    /// Shrink the font until every line fits its slot and stays narrow.
    ///
    /// `measure(text, font_size)` returns the rendered `(width, height)`.
    pub fn fit(
        lines: Vec<String>,
        pane: PaneSize,
        mut measure: impl FnMut(&str, f32) -> (f32, f32),
    ) -> Self {
        let slots = lines.len().max(1) as f32;
        let max_height = pane.height as f32 / slots * HEIGHT_SHARE;
        let max_width = pane.width as f32 * WIDTH_SHARE;
        let mut font_size = LEGEND_START_SIZE;
        loop {
            let (width, height) = lines
                .iter()
                .map(|line| measure(line, font_size))
                .fold((0.0f32, 0.0f32), |(w, h), (lw, lh)| (w.max(lw), h.max(lh)));
            let fits = width <= max_width && height <= max_height;
            if fits || font_size * SHRINK < MIN_SIZE {
                return Self {
                    font_size,
                    line_height: height,
                    lines,
                };
            }
            font_size *= SHRINK;
        }
    }

    /// Bottom-centre anchor of each line, relative to the display's top-left.
    pub fn anchors(&self, pane: PaneSize) -> Vec<(f32, f32)> {
        let seam = pane.width as f32;
        (1..=self.lines.len())
            .map(|row| (seam, self.line_height * row as f32))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn monospace(text: &str, size: f32) -> (f32, f32) {
        (text.chars().count() as f32 * size * 0.5, size * 1.2)
    }

    fn lines() -> Vec<String> {
        vec!["0: junk".into(), "1: curling".into(), "U: Undo".into()]
    }

    #[test]
    fn fit_respects_width_and_height_bounds() {
        let pane = PaneSize::new(600, 600);
        let layout = LegendLayout::fit(lines(), pane, monospace);
        let (width, height) = monospace("1: curling", layout.font_size);
        assert!(width <= 600.0 * 0.2);
        assert!(height <= 600.0 / 3.0 * 0.7);
        let (wider, _) = monospace("1: curling", layout.font_size / 0.9);
        assert!(wider > 600.0 * 0.2, "font should be the largest that fits");
    }

    #[test]
    fn many_lines_are_limited_by_height() {
        let pane = PaneSize::new(2000, 200);
        let many: Vec<String> = (0..10).map(|i| format!("{i}: c")).collect();
        let layout = LegendLayout::fit(many, pane, monospace);
        assert!(layout.line_height <= 200.0 / 10.0 * 0.7);
    }

    #[test]
    fn tiny_panes_stop_at_minimum_size() {
        let layout = LegendLayout::fit(lines(), PaneSize::new(1, 1), monospace);
        assert!(layout.font_size >= MIN_SIZE);
        assert!(layout.font_size < MIN_SIZE / SHRINK);
    }

    #[test]
    fn anchors_sit_on_the_seam_one_line_apart() {
        let layout = LegendLayout {
            font_size: 10.0,
            line_height: 12.0,
            lines: lines(),
        };
        assert_eq!(
            layout.anchors(PaneSize::new(300, 300)),
            vec![(300.0, 12.0), (300.0, 24.0), (300.0, 36.0)]
        );
    }
}
