use anyhow::{bail, Result};

use crate::layout_constants::DEFAULT_FRAME_HEIGHT;
use crate::tui::layout::{recompute, CalendarMeasurement, LayoutInputs};

/// Inputs of a one-off layout computation, all in pixels
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LayoutArgs {
    pub container_px: u32,
    pub frame_px: u32,
    pub sidebar: bool,
    pub open: bool,
    /// Measured input and calendar heights; estimated when absent
    pub measured: Option<(u32, u32)>,
}

/// Print what the layout engine decides for the given geometry
pub fn run(args: LayoutArgs) -> Result<()> {
    print!("{}", render(args)?);
    Ok(())
}

pub fn render(args: LayoutArgs) -> Result<String> {
    if args.measured.is_some() && !args.open {
        bail!("Measured heights only apply to an open calendar (add --open)");
    }

    let inputs = LayoutInputs {
        container_width_px: Some(args.container_px),
        frame_width_px: Some(args.frame_px),
        sidebar_mode: args.sidebar,
    };
    let measurement = args.measured.map(|(input, calendar)| CalendarMeasurement {
        input_height_px: input,
        calendar_height_px: calendar,
    });
    let snapshot = recompute(&inputs, args.open, measurement);
    let size_class = match snapshot.size_class().as_str() {
        "" => "default",
        other => other,
    };

    let mut out = String::new();
    out.push_str(&format!(
        "Container: {}px  Frame: {}px  Sidebar: {}\n",
        args.container_px,
        args.frame_px,
        if args.sidebar { "yes" } else { "no" }
    ));
    out.push_str(&format!("Scale:        {:.4}\n", snapshot.scale.value()));
    out.push_str(&format!("Size class:   {}\n", size_class));
    out.push_str(&format!("Placement:    {}\n", snapshot.placement().as_str()));
    out.push_str(&format!("Day columns:  {}\n", snapshot.scale.day_column_width()));
    if args.open {
        let source = if measurement.is_some() { "measured" } else { "estimated" };
        out.push_str(&format!("Frame height: {}px ({})\n", snapshot.frame_height_px, source));
    } else {
        out.push_str(&format!("Frame height: {}px (closed)\n", DEFAULT_FRAME_HEIGHT));
    }
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(container_px: u32, frame_px: u32) -> LayoutArgs {
        LayoutArgs {
            container_px,
            frame_px,
            sidebar: false,
            open: false,
            measured: None,
        }
    }

    #[test]
    fn test_wide_closed() {
        let out = render(args(600, 800)).unwrap();
        assert!(out.contains("Scale:        1.0000"));
        assert!(out.contains("Size class:   default"));
        assert!(out.contains("Placement:    bottom-start"));
        assert!(out.contains("Frame height: 80px (closed)"));
    }

    #[test]
    fn test_narrow_open_estimate() {
        let out = render(LayoutArgs {
            open: true,
            ..args(220, 800)
        })
        .unwrap();
        // 210 / 280 = 0.75 → ceil(330 * 0.75) + 110
        assert!(out.contains("Scale:        0.7500"));
        assert!(out.contains("Size class:   very-narrow"));
        assert!(out.contains("Placement:    top-start"));
        assert!(out.contains("Frame height: 358px (estimated)"));
    }

    #[test]
    fn test_measured_open() {
        let out = render(LayoutArgs {
            open: true,
            measured: Some((80, 200)),
            ..args(600, 800)
        })
        .unwrap();
        assert!(out.contains("Frame height: 300px (measured)"));
    }

    #[test]
    fn test_measured_requires_open() {
        assert!(render(LayoutArgs {
            measured: Some((80, 200)),
            ..args(600, 800)
        })
        .is_err());
    }
}
