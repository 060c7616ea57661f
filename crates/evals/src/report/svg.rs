//! Minimal SVG document builder
//!
//! Just enough drawing primitives for the report charts: rectangles, lines,
//! polygons, circles and text. Coordinates are in pixels, origin top-left.

/// Horizontal text alignment
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Anchor {
    Start,
    Middle,
    End,
}

impl Anchor {
    fn as_str(self) -> &'static str {
        match self {
            Anchor::Start => "start",
            Anchor::Middle => "middle",
            Anchor::End => "end",
        }
    }
}

/// Text appearance
#[derive(Debug, Clone)]
pub struct TextStyle {
    pub size: f64,
    pub anchor: Anchor,
    pub bold: bool,
    pub fill: String,
    /// Rotation in degrees around the text origin
    pub rotate: Option<f64>,
}

impl Default for TextStyle {
    fn default() -> Self {
        Self {
            size: 12.0,
            anchor: Anchor::Start,
            bold: false,
            fill: "#222222".to_string(),
            rotate: None,
        }
    }
}

impl TextStyle {
    pub fn new(size: f64) -> Self {
        Self {
            size,
            ..Default::default()
        }
    }

    pub fn anchor(mut self, anchor: Anchor) -> Self {
        self.anchor = anchor;
        self
    }

    pub fn bold(mut self) -> Self {
        self.bold = true;
        self
    }

    pub fn fill(mut self, fill: impl Into<String>) -> Self {
        self.fill = fill.into();
        self
    }

    pub fn rotate(mut self, degrees: f64) -> Self {
        self.rotate = Some(degrees);
        self
    }
}

/// Stroke appearance for lines and outlines
#[derive(Debug, Clone)]
pub struct Stroke {
    pub color: String,
    pub width: f64,
    pub dash: Option<&'static str>,
}

impl Stroke {
    pub fn new(color: impl Into<String>, width: f64) -> Self {
        Self {
            color: color.into(),
            width,
            dash: None,
        }
    }

    pub fn dashed(mut self) -> Self {
        self.dash = Some("8,5");
        self
    }

    pub fn dotted(mut self) -> Self {
        self.dash = Some("2,4");
        self
    }

    fn attrs(&self) -> String {
        let mut attrs = format!(
            "stroke=\"{}\" stroke-width=\"{:.1}\"",
            self.color, self.width
        );
        if let Some(dash) = self.dash {
            attrs.push_str(&format!(" stroke-dasharray=\"{}\"", dash));
        }
        attrs
    }
}

/// An SVG document under construction
#[derive(Debug)]
pub struct Svg {
    width: f64,
    height: f64,
    defs: String,
    body: String,
}

impl Svg {
    /// Start a document with a white background
    pub fn new(width: f64, height: f64) -> Self {
        let mut svg = Self {
            width,
            height,
            defs: String::new(),
            body: String::new(),
        };
        svg.rect(0.0, 0.0, width, height, "#ffffff", None);
        svg
    }

    pub fn width(&self) -> f64 {
        self.width
    }

    pub fn rect(&mut self, x: f64, y: f64, w: f64, h: f64, fill: &str, stroke: Option<&Stroke>) {
        let stroke = stroke.map(|s| format!(" {}", s.attrs())).unwrap_or_default();
        self.body.push_str(&format!(
            "  <rect x=\"{x:.1}\" y=\"{y:.1}\" width=\"{:.1}\" height=\"{:.1}\" fill=\"{fill}\"{stroke}/>\n",
            w.max(0.0),
            h.max(0.0)
        ));
    }

    /// Rectangle with rounded corners and partial opacity, used for notes
    pub fn panel(&mut self, x: f64, y: f64, w: f64, h: f64, fill: &str, opacity: f64) {
        self.body.push_str(&format!(
            "  <rect x=\"{x:.1}\" y=\"{y:.1}\" width=\"{w:.1}\" height=\"{h:.1}\" rx=\"8\" fill=\"{fill}\" fill-opacity=\"{opacity:.2}\" stroke=\"#999999\"/>\n"
        ));
    }

    pub fn line(&mut self, x1: f64, y1: f64, x2: f64, y2: f64, stroke: &Stroke) {
        self.body.push_str(&format!(
            "  <line x1=\"{x1:.1}\" y1=\"{y1:.1}\" x2=\"{x2:.1}\" y2=\"{y2:.1}\" {}/>\n",
            stroke.attrs()
        ));
    }

    pub fn circle(&mut self, cx: f64, cy: f64, r: f64, fill: &str, stroke: Option<&Stroke>) {
        let stroke = stroke.map(|s| format!(" {}", s.attrs())).unwrap_or_default();
        self.body.push_str(&format!(
            "  <circle cx=\"{cx:.1}\" cy=\"{cy:.1}\" r=\"{r:.1}\" fill=\"{fill}\"{stroke}/>\n"
        ));
    }

    pub fn polygon(
        &mut self,
        points: &[(f64, f64)],
        fill: &str,
        fill_opacity: f64,
        stroke: &Stroke,
    ) {
        let points = points
            .iter()
            .map(|(x, y)| format!("{x:.1},{y:.1}"))
            .collect::<Vec<_>>()
            .join(" ");
        self.body.push_str(&format!(
            "  <polygon points=\"{points}\" fill=\"{fill}\" fill-opacity=\"{fill_opacity:.2}\" {}/>\n",
            stroke.attrs()
        ));
    }

    pub fn text(&mut self, x: f64, y: f64, content: &str, style: &TextStyle) {
        let weight = if style.bold { " font-weight=\"bold\"" } else { "" };
        let transform = style
            .rotate
            .map(|deg| format!(" transform=\"rotate({deg:.1} {x:.1} {y:.1})\""))
            .unwrap_or_default();
        self.body.push_str(&format!(
            "  <text x=\"{x:.1}\" y=\"{y:.1}\" font-family=\"sans-serif\" font-size=\"{:.1}\" text-anchor=\"{}\" fill=\"{}\"{weight}{transform}>{}</text>\n",
            style.size,
            style.anchor.as_str(),
            style.fill,
            escape(content)
        ));
    }

    /// Several lines of text starting at `y`, `line_height` apart
    pub fn text_lines<S: AsRef<str>>(
        &mut self,
        x: f64,
        y: f64,
        line_height: f64,
        lines: &[S],
        style: &TextStyle,
    ) {
        for (i, line) in lines.iter().enumerate() {
            self.text(x, y + i as f64 * line_height, line.as_ref(), style);
        }
    }

    /// Top-to-bottom gradient usable as `fill="url(#id)"`
    pub fn vertical_gradient(&mut self, id: &str, stops: &[(f64, String)]) {
        self.defs.push_str(&format!(
            "    <linearGradient id=\"{id}\" x1=\"0\" y1=\"0\" x2=\"0\" y2=\"1\">\n"
        ));
        for (offset, color) in stops {
            self.defs.push_str(&format!(
                "      <stop offset=\"{:.1}%\" stop-color=\"{color}\"/>\n",
                offset * 100.0
            ));
        }
        self.defs.push_str("    </linearGradient>\n");
    }

    /// Serialize the document
    pub fn finish(self) -> String {
        let mut out = String::with_capacity(self.body.len() + self.defs.len() + 256);
        out.push_str("<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n");
        out.push_str(&format!(
            "<svg xmlns=\"http://www.w3.org/2000/svg\" width=\"{w:.0}\" height=\"{h:.0}\" viewBox=\"0 0 {w:.0} {h:.0}\">\n",
            w = self.width,
            h = self.height
        ));
        if !self.defs.is_empty() {
            out.push_str("  <defs>\n");
            out.push_str(&self.defs);
            out.push_str("  </defs>\n");
        }
        out.push_str(&self.body);
        out.push_str("</svg>\n");
        out
    }
}

/// Escape text for use in XML content and attributes
pub fn escape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&apos;"),
            c => out.push(c),
        }
    }
    out
}

/// RGB color
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rgb(pub u8, pub u8, pub u8);

impl Rgb {
    pub fn hex(&self) -> String {
        format!("#{:02x}{:02x}{:02x}", self.0, self.1, self.2)
    }

    fn lerp(a: Rgb, b: Rgb, t: f64) -> Rgb {
        let mix = |x: u8, y: u8| (x as f64 + (y as f64 - x as f64) * t).round() as u8;
        Rgb(mix(a.0, b.0), mix(a.1, b.1), mix(a.2, b.2))
    }
}

/// Sample a piecewise-linear palette at `t` in [0, 1]
pub fn sample_palette(palette: &[Rgb], t: f64) -> Rgb {
    match palette {
        [] => Rgb(0, 0, 0),
        [only] => *only,
        _ => {
            let t = if t.is_nan() { 0.0 } else { t.clamp(0.0, 1.0) };
            let scaled = t * (palette.len() - 1) as f64;
            let i = (scaled.floor() as usize).min(palette.len() - 2);
            Rgb::lerp(palette[i], palette[i + 1], scaled - i as f64)
        }
    }
}

/// Red to yellow to green, for scores where high is good
pub const RED_YELLOW_GREEN: [Rgb; 5] = [
    Rgb(0xa5, 0x00, 0x26),
    Rgb(0xf4, 0x6d, 0x43),
    Rgb(0xff, 0xff, 0xbf),
    Rgb(0x66, 0xbd, 0x63),
    Rgb(0x00, 0x68, 0x37),
];

/// Perceptually ordered blue-green-yellow palette for categorical bars
pub const VIRIDIS: [Rgb; 5] = [
    Rgb(0x44, 0x01, 0x54),
    Rgb(0x3b, 0x52, 0x8b),
    Rgb(0x21, 0x91, 0x8c),
    Rgb(0x5e, 0xc9, 0x62),
    Rgb(0xfd, 0xe7, 0x25),
];

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_escape() {
        assert_eq!(escape("IA & <Productivité>"), "IA &amp; &lt;Productivité&gt;");
        assert_eq!(escape("l'\"art\""), "l&apos;&quot;art&quot;");
    }

    #[test]
    fn test_document_structure() {
        let mut svg = Svg::new(200.0, 100.0);
        svg.vertical_gradient("g", &[(0.0, "#000000".to_string()), (1.0, "#ffffff".to_string())]);
        svg.text(10.0, 20.0, "A & B", &TextStyle::new(14.0).bold().rotate(-30.0));
        svg.line(0.0, 0.0, 10.0, 10.0, &Stroke::new("green", 2.0).dashed());
        let out = svg.finish();

        assert!(out.starts_with("<?xml"));
        assert!(out.contains("viewBox=\"0 0 200 100\""));
        assert!(out.contains("<linearGradient id=\"g\""));
        assert!(out.contains(">A &amp; B</text>"));
        assert!(out.contains("rotate(-30.0 10.0 20.0)"));
        assert!(out.contains("stroke-dasharray=\"8,5\""));
        assert!(out.trim_end().ends_with("</svg>"));
    }

    #[test]
    fn test_palette_endpoints() {
        assert_eq!(sample_palette(&RED_YELLOW_GREEN, 0.0), RED_YELLOW_GREEN[0]);
        assert_eq!(sample_palette(&RED_YELLOW_GREEN, 1.0), RED_YELLOW_GREEN[4]);
        assert_eq!(sample_palette(&RED_YELLOW_GREEN, 0.5), RED_YELLOW_GREEN[2]);
        assert_eq!(sample_palette(&RED_YELLOW_GREEN, 2.0), RED_YELLOW_GREEN[4]);
        assert_eq!(sample_palette(&RED_YELLOW_GREEN, f64::NAN), RED_YELLOW_GREEN[0]);
    }

    #[test]
    fn test_hex() {
        assert_eq!(Rgb(0xe7, 0x4c, 0x3c).hex(), "#e74c3c");
    }
}
