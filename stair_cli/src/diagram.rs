//! Text stair profile for terminal output.
//!
//! Only the riser count and the landing flag feed the drawing; proportions
//! are schematic, not to scale.

/// Columns per step: one riser plus the tread.
const STEP_WIDTH: usize = 4;
/// A landing is drawn three treads wide.
const LANDING_STEPS: usize = 3;
/// Taller stairs are clipped to this many drawn risers.
pub const MAX_DRAWN_RISERS: u32 = 24;

/// Render a stair profile, bottom step last. Zero risers draws nothing.
pub fn render(number_of_risers: u32, include_landing: bool) -> String {
    if number_of_risers == 0 {
        return String::new();
    }

    let drawn = number_of_risers.min(MAX_DRAWN_RISERS) as usize;
    let tread = "_".repeat(STEP_WIDTH - 1);
    let landing = "_".repeat(STEP_WIDTH * LANDING_STEPS - 1);

    let mut lines = Vec::with_capacity(drawn + 1);
    if drawn < number_of_risers as usize {
        lines.push(format!("(showing {} of {} risers)", drawn, number_of_risers));
    }

    for step in (0..drawn).rev() {
        let top = step + 1 == drawn;
        let surface = if top && include_landing { &landing } else { &tread };
        lines.push(format!("{}|{}", " ".repeat(step * STEP_WIDTH), surface));
    }

    lines.join("\n")
}
