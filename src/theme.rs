use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Theme {
    pub font_family: String,
    pub font_size: f32,
    pub background: String,
    pub cell_fill: String,
    pub cell_border: String,
    pub highlight_fill: String,
    pub highlight_border: String,
    pub highlight_text_color: String,
    pub text_color: String,
    pub muted_text_color: String,
    pub line_color: String,
    pub weight_fill: String,
    pub weight_border: String,
}

impl Theme {
    /// Light gray canvas, white cells, blue highlights.
    pub fn classic() -> Self {
        Self {
            font_family: "ui-sans-serif, system-ui, -apple-system, sans-serif".to_string(),
            font_size: 14.0,
            background: "#F9FAFB".to_string(),
            cell_fill: "#FFFFFF".to_string(),
            cell_border: "#D1D5DB".to_string(),
            highlight_fill: "#3B82F6".to_string(),
            highlight_border: "#1D4ED8".to_string(),
            highlight_text_color: "#FFFFFF".to_string(),
            text_color: "#1F2937".to_string(),
            muted_text_color: "#6B7280".to_string(),
            line_color: "#6B7280".to_string(),
            weight_fill: "#FFFFFF".to_string(),
            weight_border: "#D1D5DB".to_string(),
        }
    }

    pub fn modern() -> Self {
        Self {
            font_family: "Inter, Segoe UI, system-ui, -apple-system, sans-serif".to_string(),
            font_size: 13.0,
            background: "#FFFFFF".to_string(),
            cell_fill: "#F8FAFF".to_string(),
            cell_border: "#C7D2E5".to_string(),
            highlight_fill: "#22D3EE".to_string(),
            highlight_border: "#0E7490".to_string(),
            highlight_text_color: "#0B1220".to_string(),
            text_color: "#1C2430".to_string(),
            muted_text_color: "#7A8AA6".to_string(),
            line_color: "#7A8AA6".to_string(),
            weight_fill: "#EEF2F8".to_string(),
            weight_border: "#D7E0F0".to_string(),
        }
    }
}

impl Default for Theme {
    fn default() -> Self {
        Self::classic()
    }
}
