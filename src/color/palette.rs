use super::Color;

pub const RED: Color = Color::new(255.0, 0.0, 0.0);
pub const ORANGE: Color = Color::new(255.0, 127.0, 0.0);
pub const YELLOW: Color = Color::new(255.0, 255.0, 0.0);
pub const GREEN: Color = Color::new(0.0, 255.0, 0.0);
pub const BLUE: Color = Color::new(0.0, 0.0, 255.0);
pub const INDIGO: Color = Color::new(75.0, 0.0, 130.0);
pub const VIOLET: Color = Color::new(148.0, 0.0, 211.0);
pub const BLACK: Color = Color::new(0.0, 0.0, 0.0);

/// Eight rainbow stops, closing back to red
pub const RAINBOW: [Color; 9] = [
    RED,
    Color::new(171.0, 85.0, 0.0),  // orange
    Color::new(171.0, 171.0, 0.0), // yellow
    GREEN,
    Color::new(0.0, 171.0, 85.0), // aqua
    BLUE,
    Color::new(85.0, 0.0, 171.0), // purple
    VIOLET,
    RED,
];

/// Primary and secondary colors, closing back to red
pub const PRIMARY: [Color; 7] = [
    RED,
    YELLOW,
    GREEN,
    Color::new(0.0, 255.0, 255.0), // cyan
    BLUE,
    Color::new(255.0, 0.0, 255.0), // purple
    RED,
];

pub const HALLOWEEN: [Color; 3] = [RED, Color::new(127.0, 0.0, 255.0), RED];

pub const CHRISTMAS: [Color; 3] = [RED, GREEN, RED];
