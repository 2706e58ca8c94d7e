//! SVG rendering of a [`MapScene`] with the vehicle marker at a given
//! render-space position.

use std::borrow::Cow;
use std::fmt::{self, Write};

use crate::geometry::Point;
use crate::scene::MapScene;

/// Vehicle marker radius in render units.
const VEHICLE_RADIUS: f64 = 10.0;

/// Render the whole map as a standalone SVG document.
pub fn render(scene: &MapScene, vehicle: Point) -> String {
    let mut out = String::with_capacity(16 * 1024);
    // Writing into a String cannot fail.
    let _ = write_svg(&mut out, scene, vehicle);
    out
}

/// Stream the SVG document into any `fmt::Write` sink.
pub fn write_svg(out: &mut impl Write, scene: &MapScene, vehicle: Point) -> fmt::Result {
    let (w, h) = (scene.view_box.width, scene.view_box.height);
    let rot = format!(
        "rotate({} {} {})",
        num(scene.rotation.angle_deg),
        num(scene.rotation.center.x),
        num(scene.rotation.center.y)
    );
    let palette = &scene.palette;

    writeln!(
        out,
        r#"<svg viewBox="0 0 {} {}" preserveAspectRatio="xMidYMid slice" xmlns="http://www.w3.org/2000/svg">"#,
        num(w),
        num(h)
    )?;
    writeln!(
        out,
        r##"<defs><filter id="shadow" x="-50%" y="-50%" width="200%" height="200%"><feDropShadow dx="2" dy="2" stdDeviation="3" flood-color="#000000" flood-opacity="0.35"/></filter></defs>"##
    )?;
    writeln!(
        out,
        r#"<rect x="0" y="0" width="{}" height="{}" fill="{}"/>"#,
        num(w),
        num(h),
        esc(&palette.background)
    )?;

    writeln!(
        out,
        r#"<g class="grid" opacity="{}" transform="{rot}">"#,
        num(scene.grid_opacity)
    )?;
    for line in &scene.grid {
        writeln!(
            out,
            r#"<line x1="{}" y1="{}" x2="{}" y2="{}" stroke="{}" stroke-width="1"/>"#,
            num(line.from.x),
            num(line.from.y),
            num(line.to.x),
            num(line.to.y),
            esc(&palette.grid_stroke)
        )?;
    }
    writeln!(out, "</g>")?;

    writeln!(out, r#"<g class="building" transform="{rot}">"#)?;
    for part in &scene.building {
        writeln!(
            out,
            r#"<rect x="{}" y="{}" width="{}" height="{}" fill="{}" stroke="{}" stroke-width="1.5" filter="url(#shadow)"/>"#,
            num(part.origin.x),
            num(part.origin.y),
            num(part.width),
            num(part.height),
            esc(&part.fill),
            esc(&palette.building_stroke)
        )?;
    }
    writeln!(out, "</g>")?;

    writeln!(
        out,
        r#"<circle class="vehicle" cx="{}" cy="{}" r="{}" fill="{}"/>"#,
        num(vehicle.x),
        num(vehicle.y),
        num(VEHICLE_RADIUS),
        esc(&palette.vehicle)
    )?;

    let pin = &scene.pin;
    writeln!(
        out,
        r#"<circle class="pin" cx="{}" cy="{}" r="{}" fill="{}"/>"#,
        num(pin.head_center.x),
        num(pin.head_center.y),
        num(pin.head_radius),
        esc(&palette.pin)
    )?;
    writeln!(
        out,
        r#"<path d="M{},{} L{},{}" stroke="{}" stroke-width="{}"/>"#,
        num(pin.stem_from.x),
        num(pin.stem_from.y),
        num(pin.stem_to.x),
        num(pin.stem_to.y),
        esc(&palette.pin),
        num(pin.stem_width)
    )?;
    writeln!(
        out,
        r#"<circle cx="{}" cy="{}" r="{}" fill="white"/>"#,
        num(pin.anchor.x),
        num(pin.anchor.y),
        num(pin.dot_radius)
    )?;
    write!(out, "</svg>")
}

/// Escape a config string for use inside a double-quoted attribute.
fn esc(s: &str) -> Cow<'_, str> {
    if !s.contains(|c: char| matches!(c, '&' | '<' | '>' | '"')) {
        return Cow::Borrowed(s);
    }
    let mut out = String::with_capacity(s.len() + 8);
    for c in s.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            c => out.push(c),
        }
    }
    Cow::Owned(out)
}

/// Fixed-precision number without trailing zeros.
fn num(v: f64) -> String {
    let s = format!("{v:.3}");
    let s = s.trim_end_matches('0').trim_end_matches('.');
    if s == "-0" {
        "0".to_string()
    } else {
        s.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::{esc, num};

    #[test]
    fn numbers_are_trimmed() {
        assert_eq!(num(125.0), "125");
        assert_eq!(num(0.8), "0.8");
        assert_eq!(num(-0.0001), "0");
        assert_eq!(num(433.0127), "433.013");
    }

    #[test]
    fn attribute_text_is_escaped() {
        assert_eq!(esc("#4f46e5"), "#4f46e5");
        assert_eq!(esc(r#"red" onload="x"#), "red&quot; onload=&quot;x");
        assert_eq!(esc("a<b>&c"), "a&lt;b&gt;&amp;c");
    }
}
