//! CSS color values and parsing.
//!
//! [CSS Color Level 4](https://www.w3.org/TR/css-color-4/)
//!
//! Accepted forms: named colors, `transparent`, `#rgb`, `#rgba`, `#rrggbb`,
//! `#rrggbbaa`, `rgb()`/`rgba()` with integer or percentage channels, and
//! `hsl()`/`hsla()`. The inheritance keywords `inherit`, `currentColor` and
//! `currentcolor` parse to [`ParsedColor::Inherit`].

use serde::Serialize;

/// [§ 4 Color syntax](https://www.w3.org/TR/css-color-4/#color-syntax)
/// sRGB color represented as RGBA components.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct ColorValue {
    /// "the red color channel" (0-255)
    pub r: u8,
    /// "the green color channel" (0-255)
    pub g: u8,
    /// "the blue color channel" (0-255)
    pub b: u8,
    /// "the alpha channel" (0-255, 255 = fully opaque)
    pub a: u8,
}

/// Result of parsing a color-valued property.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParsedColor {
    /// A concrete color.
    Color(ColorValue),
    /// `inherit` / `currentColor`: take the color from elsewhere.
    Inherit,
}

impl ColorValue {
    /// Black (#000000)
    pub const BLACK: Self = Self::rgb(0, 0, 0);

    /// White (#ffffff)
    pub const WHITE: Self = Self::rgb(255, 255, 255);

    /// Fully transparent black.
    pub const TRANSPARENT: Self = Self {
        r: 0,
        g: 0,
        b: 0,
        a: 0,
    };

    /// An opaque color.
    #[must_use]
    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b, a: 255 }
    }

    /// [§ 4.2 The RGB hexadecimal notations](https://www.w3.org/TR/css-color-4/#hex-notation)
    /// "The syntax of a <hex-color> is a <hash-token> token whose value consists of
    /// 3, 4, 6, or 8 hexadecimal digits."
    #[must_use]
    pub fn from_hex(hex: &str) -> Option<Self> {
        let hex = hex.strip_prefix('#').unwrap_or(hex);
        if !hex.bytes().all(|b| b.is_ascii_hexdigit()) {
            return None;
        }
        // "The three-digit RGB notation (#RGB) is converted into six-digit form (#RRGGBB)
        // by replicating digits, not by adding zeros."
        let short = |i: usize| u8::from_str_radix(&hex[i..=i], 16).ok().map(|v| v * 17);
        let long = |i: usize| u8::from_str_radix(&hex[i..i + 2], 16).ok();
        match hex.len() {
            3 => Some(Self::rgb(short(0)?, short(1)?, short(2)?)),
            4 => Some(Self {
                r: short(0)?,
                g: short(1)?,
                b: short(2)?,
                a: short(3)?,
            }),
            6 => Some(Self::rgb(long(0)?, long(2)?, long(4)?)),
            8 => Some(Self {
                r: long(0)?,
                g: long(2)?,
                b: long(4)?,
                a: long(6)?,
            }),
            _ => None,
        }
    }

    /// [§ 6.1 Named Colors](https://www.w3.org/TR/css-color-4/#named-colors)
    /// "CSS defines a large set of named colors..."
    #[must_use]
    pub fn from_named(name: &str) -> Option<Self> {
        if name.eq_ignore_ascii_case("transparent") {
            return Some(Self::TRANSPARENT);
        }
        NAMED_COLORS
            .iter()
            .find(|(n, _)| n.eq_ignore_ascii_case(name))
            .map(|&(_, packed)| {
                let [_, r, g, b] = packed.to_be_bytes();
                Self::rgb(r, g, b)
            })
    }

    /// Scale alpha by an `opacity` in `0..=1`.
    #[must_use]
    pub fn with_opacity(self, opacity: f32) -> Self {
        let opacity = opacity.clamp(0.0, 1.0);
        Self {
            a: (f32::from(self.a) * opacity).round() as u8,
            ..self
        }
    }

    /// Convert to hex string notation (#RRGGBB or #RRGGBBAA if alpha != 255)
    ///
    /// [§ 4.2 The RGB hexadecimal notations](https://www.w3.org/TR/css-color-4/#hex-notation)
    #[must_use]
    pub fn to_hex_string(&self) -> String {
        if self.a == 255 {
            format!("#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
        } else {
            format!("#{:02x}{:02x}{:02x}{:02x}", self.r, self.g, self.b, self.a)
        }
    }
}

/// Whether `value` is one of the keywords that defer to another color.
#[must_use]
pub fn is_inherit_keyword(value: &str) -> bool {
    matches!(value, "inherit" | "currentColor" | "currentcolor")
}

/// Parse a color-valued property.
///
/// Returns `None` for anything that is not a color.
#[must_use]
pub fn parse_color(value: &str) -> Option<ParsedColor> {
    let value = value.trim();
    if is_inherit_keyword(value) {
        return Some(ParsedColor::Inherit);
    }
    if value.len() < 3 {
        return None;
    }
    if value.starts_with('#') {
        return ColorValue::from_hex(value).map(ParsedColor::Color);
    }
    if let Some(named) = ColorValue::from_named(value) {
        return Some(ParsedColor::Color(named));
    }

    let compact: String = value.chars().filter(|c| !c.is_whitespace()).collect();
    let compact = compact.to_ascii_lowercase();
    let (function, args) = compact.strip_suffix(')')?.split_once('(')?;
    let args: Vec<&str> = args.split(',').collect();

    let color = match (function, args.as_slice()) {
        ("rgb", [r, g, b]) => rgb_channels(r, g, b)?,
        ("rgba", [r, g, b, a]) => with_alpha(rgb_channels(r, g, b)?, a)?,
        ("hsl", [h, s, l]) => hsl_channels(h, s, l)?,
        ("hsla", [h, s, l, a]) => with_alpha(hsl_channels(h, s, l)?, a)?,
        _ => return None,
    };
    Some(ParsedColor::Color(color))
}

/// Replace the alpha of `color` with an `a` in `0..=1`, clamped.
fn with_alpha(color: ColorValue, alpha: &str) -> Option<ColorValue> {
    let alpha: f64 = alpha.parse().ok()?;
    Some(ColorValue {
        a: (alpha.clamp(0.0, 1.0) * 255.0) as u8,
        ..color
    })
}

/// Three `rgb()` channels: all integers or all percentages.
fn rgb_channels(r: &str, g: &str, b: &str) -> Option<ColorValue> {
    let percentages = [r, g, b].iter().filter(|c| c.ends_with('%')).count();
    let channel = |c: &str| -> Option<u8> {
        if percentages == 3 {
            let pct: f64 = c.strip_suffix('%')?.parse().ok()?;
            Some((pct.clamp(0.0, 100.0) / 100.0 * 255.0) as u8)
        } else {
            let v: i64 = c.parse().ok()?;
            Some(v.clamp(0, 255) as u8)
        }
    };
    if percentages != 0 && percentages != 3 {
        return None;
    }
    Some(ColorValue::rgb(channel(r)?, channel(g)?, channel(b)?))
}

/// `hsl()` hue in degrees, saturation and lightness as percentages.
fn hsl_channels(h: &str, s: &str, l: &str) -> Option<ColorValue> {
    let h: f64 = h.strip_suffix("deg").unwrap_or(h).parse().ok()?;
    let s: f64 = s.strip_suffix('%')?.parse().ok()?;
    let l: f64 = l.strip_suffix('%')?.parse().ok()?;
    let [r, g, b] = hsl_to_rgb(h, s.clamp(0.0, 100.0), l.clamp(0.0, 100.0));
    Some(ColorValue::rgb(r, g, b))
}

/// [§ 7.1 HSL to RGB](https://www.w3.org/TR/css-color-4/#hsl-to-rgb)
///
/// `h` in degrees, `s` and `l` in percent. Channels are rounded to the nearest integer.
#[must_use]
pub fn hsl_to_rgb(h: f64, s: f64, l: f64) -> [u8; 3] {
    let h = h.rem_euclid(360.0) / 360.0;
    let s = s / 100.0;
    let l = l / 100.0;

    if s == 0.0 {
        let v = (l * 255.0).round() as u8;
        return [v, v, v];
    }

    let t2 = if l < 0.5 { l * (1.0 + s) } else { l + s - l * s };
    let t1 = 2.0 * l - t2;

    let channel = |offset: f64| {
        let mut t3 = h + offset;
        if t3 < 0.0 {
            t3 += 1.0;
        }
        if t3 > 1.0 {
            t3 -= 1.0;
        }
        let v = if 6.0 * t3 < 1.0 {
            (t2 - t1).mul_add(6.0 * t3, t1)
        } else if 2.0 * t3 < 1.0 {
            t2
        } else if 3.0 * t3 < 2.0 {
            (t2 - t1).mul_add((2.0 / 3.0 - t3) * 6.0, t1)
        } else {
            t1
        };
        (v * 255.0).round() as u8
    };

    [channel(1.0 / 3.0), channel(0.0), channel(-1.0 / 3.0)]
}

/// [§ 6.1 Named Colors](https://www.w3.org/TR/css-color-4/#named-colors), packed as `0xRRGGBB`.
const NAMED_COLORS: &[(&str, u32)] = &[
    ("aliceblue", 0xf0f8ff),
    ("antiquewhite", 0xfaebd7),
    ("aqua", 0x00ffff),
    ("aquamarine", 0x7fffd4),
    ("azure", 0xf0ffff),
    ("beige", 0xf5f5dc),
    ("bisque", 0xffe4c4),
    ("black", 0x000000),
    ("blanchedalmond", 0xffebcd),
    ("blue", 0x0000ff),
    ("blueviolet", 0x8a2be2),
    ("brown", 0xa52a2a),
    ("burlywood", 0xdeb887),
    ("cadetblue", 0x5f9ea0),
    ("chartreuse", 0x7fff00),
    ("chocolate", 0xd2691e),
    ("coral", 0xff7f50),
    ("cornflowerblue", 0x6495ed),
    ("cornsilk", 0xfff8dc),
    ("crimson", 0xdc143c),
    ("cyan", 0x00ffff),
    ("darkblue", 0x00008b),
    ("darkcyan", 0x008b8b),
    ("darkgoldenrod", 0xb8860b),
    ("darkgray", 0xa9a9a9),
    ("darkgreen", 0x006400),
    ("darkgrey", 0xa9a9a9),
    ("darkkhaki", 0xbdb76b),
    ("darkmagenta", 0x8b008b),
    ("darkolivegreen", 0x556b2f),
    ("darkorange", 0xff8c00),
    ("darkorchid", 0x9932cc),
    ("darkred", 0x8b0000),
    ("darksalmon", 0xe9967a),
    ("darkseagreen", 0x8fbc8f),
    ("darkslateblue", 0x483d8b),
    ("darkslategray", 0x2f4f4f),
    ("darkslategrey", 0x2f4f4f),
    ("darkturquoise", 0x00ced1),
    ("darkviolet", 0x9400d3),
    ("deeppink", 0xff1493),
    ("deepskyblue", 0x00bfff),
    ("dimgray", 0x696969),
    ("dimgrey", 0x696969),
    ("dodgerblue", 0x1e90ff),
    ("firebrick", 0xb22222),
    ("floralwhite", 0xfffaf0),
    ("forestgreen", 0x228b22),
    ("fuchsia", 0xff00ff),
    ("gainsboro", 0xdcdcdc),
    ("ghostwhite", 0xf8f8ff),
    ("gold", 0xffd700),
    ("goldenrod", 0xdaa520),
    ("gray", 0x808080),
    ("green", 0x008000),
    ("greenyellow", 0xadff2f),
    ("grey", 0x808080),
    ("honeydew", 0xf0fff0),
    ("hotpink", 0xff69b4),
    ("indianred", 0xcd5c5c),
    ("indigo", 0x4b0082),
    ("ivory", 0xfffff0),
    ("khaki", 0xf0e68c),
    ("lavender", 0xe6e6fa),
    ("lavenderblush", 0xfff0f5),
    ("lawngreen", 0x7cfc00),
    ("lemonchiffon", 0xfffacd),
    ("lightblue", 0xadd8e6),
    ("lightcoral", 0xf08080),
    ("lightcyan", 0xe0ffff),
    ("lightgoldenrodyellow", 0xfafad2),
    ("lightgray", 0xd3d3d3),
    ("lightgreen", 0x90ee90),
    ("lightgrey", 0xd3d3d3),
    ("lightpink", 0xffb6c1),
    ("lightsalmon", 0xffa07a),
    ("lightseagreen", 0x20b2aa),
    ("lightskyblue", 0x87cefa),
    ("lightslategray", 0x778899),
    ("lightslategrey", 0x778899),
    ("lightsteelblue", 0xb0c4de),
    ("lightyellow", 0xffffe0),
    ("lime", 0x00ff00),
    ("limegreen", 0x32cd32),
    ("linen", 0xfaf0e6),
    ("magenta", 0xff00ff),
    ("maroon", 0x800000),
    ("mediumaquamarine", 0x66cdaa),
    ("mediumblue", 0x0000cd),
    ("mediumorchid", 0xba55d3),
    ("mediumpurple", 0x9370db),
    ("mediumseagreen", 0x3cb371),
    ("mediumslateblue", 0x7b68ee),
    ("mediumspringgreen", 0x00fa9a),
    ("mediumturquoise", 0x48d1cc),
    ("mediumvioletred", 0xc71585),
    ("midnightblue", 0x191970),
    ("mintcream", 0xf5fffa),
    ("mistyrose", 0xffe4e1),
    ("moccasin", 0xffe4b5),
    ("navajowhite", 0xffdead),
    ("navy", 0x000080),
    ("oldlace", 0xfdf5e6),
    ("olive", 0x808000),
    ("olivedrab", 0x6b8e23),
    ("orange", 0xffa500),
    ("orangered", 0xff4500),
    ("orchid", 0xda70d6),
    ("palegoldenrod", 0xeee8aa),
    ("palegreen", 0x98fb98),
    ("paleturquoise", 0xafeeee),
    ("palevioletred", 0xdb7093),
    ("papayawhip", 0xffefd5),
    ("peachpuff", 0xffdab9),
    ("peru", 0xcd853f),
    ("pink", 0xffc0cb),
    ("plum", 0xdda0dd),
    ("powderblue", 0xb0e0e6),
    ("purple", 0x800080),
    ("rebeccapurple", 0x663399),
    ("red", 0xff0000),
    ("rosybrown", 0xbc8f8f),
    ("royalblue", 0x4169e1),
    ("saddlebrown", 0x8b4513),
    ("salmon", 0xfa8072),
    ("sandybrown", 0xf4a460),
    ("seagreen", 0x2e8b57),
    ("seashell", 0xfff5ee),
    ("sienna", 0xa0522d),
    ("silver", 0xc0c0c0),
    ("skyblue", 0x87ceeb),
    ("slateblue", 0x6a5acd),
    ("slategray", 0x708090),
    ("slategrey", 0x708090),
    ("snow", 0xfffafa),
    ("springgreen", 0x00ff7f),
    ("steelblue", 0x4682b4),
    ("tan", 0xd2b48c),
    ("teal", 0x008080),
    ("thistle", 0xd8bfd8),
    ("tomato", 0xff6347),
    ("turquoise", 0x40e0d0),
    ("violet", 0xee82ee),
    ("wheat", 0xf5deb3),
    ("white", 0xffffff),
    ("whitesmoke", 0xf5f5f5),
    ("yellow", 0xffff00),
    ("yellowgreen", 0x9acd32),
];
