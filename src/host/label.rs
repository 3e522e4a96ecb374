//! Floating label naming the hovered section

/// Fixed look of the label
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct LabelStyle {
    pub z_index: i32,
    /// RGBA, 0-255
    pub background: [u8; 4],
    pub color: [u8; 4],
    /// Vertical, horizontal padding in pixels
    pub padding: (f32, f32),
    pub border_radius: f32,
    /// Labels never take pointer events
    pub pointer_events: bool,
}

impl LabelStyle {
    pub const SECTION: LabelStyle = LabelStyle {
        z_index: 3,
        background: [0, 0, 0, 255],
        color: [255, 255, 255, 255],
        padding: (5.0, 10.0),
        border_radius: 5.0,
        pointer_events: false,
    };

    /// Equivalent inline CSS, for hosts that draw with HTML
    pub fn to_css(&self) -> String {
        let [br, bg, bb, _] = self.background;
        let [r, g, b, _] = self.color;
        format!(
            "position: absolute; z-index: {}; background-color: rgb({br}, {bg}, {bb}); color: rgb({r}, {g}, {b}); padding: {}px {}px; border-radius: {}px; pointer-events: {};",
            self.z_index,
            self.padding.0,
            self.padding.1,
            self.border_radius,
            if self.pointer_events { "auto" } else { "none" },
        )
    }
}

/// Overlay label positioned absolutely over the canvas
#[derive(Clone, Debug, PartialEq)]
pub struct SectionLabel {
    pub text: String,
    pub visible: bool,
    /// Pixels from the canvas' left edge
    pub left: f32,
    /// Pixels from the canvas' top edge
    pub top: f32,
    pub style: LabelStyle,
}

impl SectionLabel {
    /// Hidden, empty label
    pub fn new() -> Self {
        Self {
            text: String::new(),
            visible: false,
            left: 0.0,
            top: 0.0,
            style: LabelStyle::SECTION,
        }
    }

    pub fn show(&mut self, text: impl Into<String>) {
        self.text = text.into();
        self.visible = true;
    }

    pub fn hide(&mut self) {
        self.visible = false;
    }

    pub fn move_to(&mut self, left: f32, top: f32) {
        self.left = left;
        self.top = top;
    }
}

impl Default for SectionLabel {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_starts_hidden() {
        let label = SectionLabel::new();
        assert!(!label.visible);
        assert!(label.text.is_empty());
        assert_eq!(label.style.z_index, 3);
    }

    #[test]
    fn test_show_hide_keeps_text() {
        let mut label = SectionLabel::new();
        label.show("section room1");
        label.move_to(12.0, 34.0);
        label.hide();
        assert_eq!(label.text, "section room1");
        assert_eq!((label.left, label.top), (12.0, 34.0));
        assert!(!label.visible);
    }

    #[test]
    fn test_css() {
        let css = LabelStyle::SECTION.to_css();
        assert!(css.contains("z-index: 3"));
        assert!(css.contains("padding: 5px 10px"));
        assert!(css.contains("pointer-events: none"));
        assert!(css.contains("background-color: rgb(0, 0, 0)"));
    }
}
