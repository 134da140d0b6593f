use egui::Color32;

#[derive(Clone, PartialEq)]
pub struct Theme {
    pub name: &'static str,
    pub background: Color32,
    pub panel: Color32,
    pub text: Color32,
    pub accent: Color32,
    pub light_square: Color32,
    pub dark_square: Color32,
    pub queen: Color32,
    pub threat: Color32,
}

impl Theme {
    pub fn presets() -> Vec<Self> {
        vec![
            Self {
                name: "Sleek Dark",
                background: Color32::from_rgb(15, 23, 42),
                panel: Color32::from_rgb(30, 41, 59),
                text: Color32::from_rgb(226, 232, 240),
                accent: Color32::from_rgb(99, 102, 241),
                light_square: Color32::from_rgb(241, 245, 249),
                dark_square: Color32::from_rgb(100, 116, 139),
                queen: Color32::from_rgb(15, 23, 42),
                threat: Color32::from_rgba_unmultiplied(255, 0, 0, 40),
            },
            Self {
                name: "Classic Wood",
                background: Color32::from_rgb(45, 25, 10),
                panel: Color32::from_rgb(70, 40, 20),
                text: Color32::from_rgb(245, 230, 200),
                accent: Color32::from_rgb(180, 100, 40),
                light_square: Color32::from_rgb(210, 180, 140),
                dark_square: Color32::from_rgb(139, 69, 19),
                queen: Color32::from_rgb(45, 25, 10),
                threat: Color32::from_rgba_unmultiplied(200, 30, 0, 50),
            },
            Self {
                name: "Swing",
                background: Color32::from_rgb(238, 238, 238),
                panel: Color32::from_rgb(214, 217, 223),
                text: Color32::from_rgb(20, 20, 20),
                accent: Color32::from_rgb(255, 165, 0),
                light_square: Color32::WHITE,
                dark_square: Color32::from_rgb(120, 120, 120),
                queen: Color32::from_rgb(180, 0, 0),
                threat: Color32::from_rgba_unmultiplied(255, 255, 0, 60),
            },
        ]
    }

    /// Looks a preset up by name, falling back to the first one.
    pub fn named(name: &str) -> Self {
        let mut presets = Self::presets();
        let idx = presets.iter().position(|t| t.name == name).unwrap_or(0);
        presets.swap_remove(idx)
    }
}
