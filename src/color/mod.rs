//! Terminal colors assigned to field owners.

/// ANSI code reserved for unclaimed fields (reset).
pub const RESET_CODE: u8 = 0;

/// ANSI code reserved for fields claimed by more than one manager (red).
pub const CONFLICT_CODE: u8 = 31;

/// Codes handed out to managers in first-seen order. Red and bright red are
/// reserved for conflicts, and the whites are indistinguishable from the
/// default foreground, so neither appears here. Assignment wraps when
/// managers outnumber the palette.
const OWNED_PALETTE: [u8; 10] = [32, 33, 34, 35, 36, 92, 93, 94, 95, 96];

/// Color resolved for a single field.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum Color {
    /// Unclaimed field; rendered with the default foreground.
    #[default]
    None,
    /// Claimed by two or more managers at once.
    Conflict,
    /// Claimed by exactly one manager; carries that manager's ANSI code.
    Owned(u8),
}

impl Color {
    /// The color for the n-th distinct manager (zero-based, first-seen order).
    pub fn owned(n: usize) -> Color {
        Color::Owned(OWNED_PALETTE[n % OWNED_PALETTE.len()])
    }

    /// The ANSI SGR code carried in markers and escape sequences.
    pub fn code(&self) -> u8 {
        match self {
            Color::None => RESET_CODE,
            Color::Conflict => CONFLICT_CODE,
            Color::Owned(code) => *code,
        }
    }
}

/// Wraps text in the escape sequence for the given color.
pub fn color_string(text: &str, color: Color) -> String {
    format!("\x1b[{}m{}\x1b[{}m", color.code(), text, RESET_CODE)
}
