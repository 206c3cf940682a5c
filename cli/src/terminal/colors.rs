use colored::Color;

pub const PRIMARY: Color = Color::TrueColor { r: 94, g: 234, b: 212 };
pub const ACCENT: Color = Color::TrueColor { r: 250, g: 204, b: 21 };
pub const SEPARATOR: Color = Color::TrueColor { r: 100, g: 116, b: 139 };
pub const TEXT_DEFAULT: Color = Color::TrueColor { r: 226, g: 232, b: 240 };
pub const OPEN: Color = Color::TrueColor { r: 74, g: 222, b: 128 };
pub const FAILURE: Color = Color::TrueColor { r: 248, g: 113, b: 113 };
