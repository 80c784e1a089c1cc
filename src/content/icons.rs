//! Icon names used by content records.

/// Icons the sections know how to draw.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Icon {
    Camera,
    Aperture,
    Image,
    Eye,
    Frame,
    Focus,
    Zap,
    Scissors,
    Clock,
    Star,
    Check,
    Play,
    ChevronLeft,
    ChevronRight,
    Plus,
    Close,
}

impl Icon {
    /// Parse a content icon name (case-insensitive).
    pub fn from_name(name: &str) -> Option<Self> {
        let icon = match name.trim().to_ascii_lowercase().as_str() {
            "camera" => Icon::Camera,
            "aperture" => Icon::Aperture,
            "image" => Icon::Image,
            "eye" => Icon::Eye,
            "frame" => Icon::Frame,
            "focus" => Icon::Focus,
            "zap" => Icon::Zap,
            "scissors" => Icon::Scissors,
            "clock" => Icon::Clock,
            "star" => Icon::Star,
            "check" => Icon::Check,
            "play" => Icon::Play,
            "chevron-left" => Icon::ChevronLeft,
            "chevron-right" => Icon::ChevronRight,
            "plus" => Icon::Plus,
            "close" | "x" => Icon::Close,
            _ => return None,
        };
        Some(icon)
    }

    /// Parse, falling back to `fallback` for unknown names.
    pub fn resolve(name: &str, fallback: Icon) -> Self {
        Self::from_name(name).unwrap_or_else(|| {
            tracing::trace!(icon = name, ?fallback, "unknown icon name");
            fallback
        })
    }

    /// Asset identifier handed to the host.
    pub fn asset(&self) -> &'static str {
        match self {
            Icon::Camera => "lucide:camera",
            Icon::Aperture => "lucide:aperture",
            Icon::Image => "lucide:image",
            Icon::Eye => "lucide:eye",
            Icon::Frame => "lucide:frame",
            Icon::Focus => "lucide:focus",
            Icon::Zap => "lucide:zap",
            Icon::Scissors => "lucide:scissors",
            Icon::Clock => "lucide:clock",
            Icon::Star => "lucide:star",
            Icon::Check => "lucide:check",
            Icon::Play => "lucide:play",
            Icon::ChevronLeft => "lucide:chevron-left",
            Icon::ChevronRight => "lucide:chevron-right",
            Icon::Plus => "lucide:plus",
            Icon::Close => "lucide:x",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_name() {
        assert_eq!(Icon::from_name("camera"), Some(Icon::Camera));
        assert_eq!(Icon::from_name(" Zap "), Some(Icon::Zap));
        assert_eq!(Icon::from_name("rocket"), None);
    }

    #[test]
    fn test_resolve_fallback() {
        assert_eq!(Icon::resolve("scissors", Icon::Zap), Icon::Scissors);
        assert_eq!(Icon::resolve("unknown", Icon::Zap), Icon::Zap);
        assert_eq!(Icon::Zap.asset(), "lucide:zap");
    }
}
