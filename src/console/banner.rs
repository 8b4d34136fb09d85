// Wed Jan 21 2026 - Alex

use colored::*;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BannerStyle {
    Simple,
    Minimal,
}

/// Greeting shown once when an interactive session starts.
pub struct Banner {
    title: String,
    subtitle: Option<String>,
    version: Option<String>,
    style: BannerStyle,
    use_color: bool,
}

impl Banner {
    pub fn new(title: &str) -> Self {
        Self {
            title: title.to_string(),
            subtitle: None,
            version: None,
            style: BannerStyle::Simple,
            use_color: true,
        }
    }

    pub fn with_subtitle(mut self, subtitle: &str) -> Self {
        self.subtitle = Some(subtitle.to_string());
        self
    }

    pub fn with_version(mut self, version: &str) -> Self {
        self.version = Some(version.to_string());
        self
    }

    pub fn with_style(mut self, style: BannerStyle) -> Self {
        self.style = style;
        self
    }

    pub fn with_color(mut self, use_color: bool) -> Self {
        self.use_color = use_color;
        self
    }

    pub fn lines(&self) -> Vec<String> {
        match self.style {
            BannerStyle::Simple => self.render_simple(),
            BannerStyle::Minimal => self.render_minimal(),
        }
    }

    fn render_simple(&self) -> Vec<String> {
        let mut lines = Vec::new();

        let title = format!("=== {} ===", self.title);
        if self.use_color {
            lines.push(title.cyan().bold().to_string());
        } else {
            lines.push(title);
        }

        if let Some(subtitle) = &self.subtitle {
            lines.push(subtitle.clone());
        }

        if let Some(version) = &self.version {
            lines.push(format!("Version: {}", version));
        }

        lines
    }

    fn render_minimal(&self) -> Vec<String> {
        let mut line = match &self.version {
            Some(version) => format!("{} v{}", self.title, version),
            None => self.title.clone(),
        };

        if let Some(subtitle) = &self.subtitle {
            line = format!("{} - {}", line, subtitle);
        }

        if self.use_color {
            vec![line.dimmed().to_string()]
        } else {
            vec![line]
        }
    }
}
