use serde::{Deserialize, Serialize};

/// An 8-bit RGBA colour, as accepted by `setBackgroundColor`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Color {
    pub fn from_rgba(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    /// Parse any supported colour notation: `#rrggbb`, `#rrggbbaa`
    /// or `rgba(r,g,b,a)`.
    pub fn parse(s: &str) -> Option<Self> {
        let s = s.trim();
        if s.starts_with("rgba(") {
            Self::from_rgba_string(s)
        } else if s.starts_with('#') {
            Self::from_hex(s)
        } else {
            None
        }
    }

    pub fn from_hex(hex: &str) -> Option<Self> {
        let hex = hex.strip_prefix('#').unwrap_or(hex);
        if !hex.is_ascii() {
            return None;
        }
        let channel = |i: usize| u8::from_str_radix(&hex[i..i + 2], 16).ok();
        match hex.len() {
            6 => Some(Self {
                r: channel(0)?,
                g: channel(2)?,
                b: channel(4)?,
                a: 255,
            }),
            8 => Some(Self {
                r: channel(0)?,
                g: channel(2)?,
                b: channel(4)?,
                a: channel(6)?,
            }),
            _ => None,
        }
    }

    pub fn from_rgba_string(s: &str) -> Option<Self> {
        let s = s.trim();
        let inner = s.strip_prefix("rgba(")?.strip_suffix(')')?;
        let parts: Vec<&str> = inner.split(',').collect();
        if parts.len() != 4 {
            return None;
        }
        let r = parts[0].trim().parse::<u8>().ok()?;
        let g = parts[1].trim().parse::<u8>().ok()?;
        let b = parts[2].trim().parse::<u8>().ok()?;
        let a = parts[3].trim().parse::<u8>().ok()?;
        Some(Self { r, g, b, a })
    }

    pub fn to_hex(&self) -> String {
        if self.a == 255 {
            format!("#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
        } else {
            format!("#{:02x}{:02x}{:02x}{:02x}", self.r, self.g, self.b, self.a)
        }
    }

    /// Channel tuple in the order native webview APIs expect.
    pub fn to_tuple(self) -> (u8, u8, u8, u8) {
        (self.r, self.g, self.b, self.a)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_six_digit_hex() {
        let c = Color::parse("#1e1e2e").unwrap();
        assert_eq!(c, Color::from_rgba(0x1e, 0x1e, 0x2e, 255));
    }

    #[test]
    fn parses_eight_digit_hex() {
        let c = Color::parse("#ff000080").unwrap();
        assert_eq!(c, Color::from_rgba(255, 0, 0, 128));
        assert_eq!(c.to_hex(), "#ff000080");
    }

    #[test]
    fn parses_rgba_function() {
        let c = Color::parse(" rgba(10, 20, 30, 40) ").unwrap();
        assert_eq!(c.to_tuple(), (10, 20, 30, 40));
    }

    #[test]
    fn rejects_garbage() {
        assert!(Color::parse("").is_none());
        assert!(Color::parse("red").is_none());
        assert!(Color::parse("#12345").is_none());
        assert!(Color::parse("#gggggg").is_none());
        assert!(Color::parse("#ééé").is_none());
        assert!(Color::parse("rgba(1,2,3)").is_none());
        assert!(Color::parse("rgba(1,2,3,300)").is_none());
    }

    #[test]
    fn opaque_hex_drops_alpha() {
        assert_eq!(Color::from_rgba(0, 212, 255, 255).to_hex(), "#00d4ff");
    }
}
