//! Transparent-looking widget backgrounds cut from a home-screen screenshot.
//!
//! A widget's frame on the home screen is fixed for each phone model, so the
//! crop rectangle follows from the screenshot height alone.

use crate::{UiError, UiResult};
use scriptkit_storage::Image;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;
use tracing::debug;

/// Widget frame sizes and offsets for one screen, in screenshot pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PhoneLayout {
    pub small: u32,
    pub medium: u32,
    pub large: u32,
    pub left: u32,
    pub right: u32,
    pub top: u32,
    pub middle: u32,
    pub bottom: u32,
}

#[allow(clippy::too_many_arguments)]
const fn layout(
    small: u32,
    medium: u32,
    large: u32,
    left: u32,
    right: u32,
    top: u32,
    middle: u32,
    bottom: u32,
) -> PhoneLayout {
    PhoneLayout {
        small,
        medium,
        large,
        left,
        right,
        top,
        middle,
        bottom,
    }
}

/// Keyed by screenshot height.
const PHONES: &[(u32, PhoneLayout)] = &[
    // 14 Pro Max
    (2796, layout(510, 1092, 1146, 99, 681, 282, 918, 1554)),
    // 14 Pro
    (2556, layout(474, 1014, 1062, 82, 622, 270, 858, 1446)),
    // 12/13 Pro Max
    (2778, layout(510, 1092, 1146, 96, 678, 246, 882, 1518)),
    // 12/13, 12/13 Pro
    (2532, layout(474, 1014, 1062, 78, 618, 231, 819, 1407)),
    // 11 Pro Max, XS Max
    (2688, layout(507, 1080, 1137, 81, 654, 228, 858, 1488)),
    // 11, XR
    (1792, layout(338, 720, 758, 54, 436, 160, 580, 1000)),
    // 11 Pro, XS, X
    (2436, layout(465, 987, 1035, 69, 591, 213, 783, 1353)),
    // Plus models
    (2208, layout(471, 1044, 1071, 99, 672, 114, 696, 1278)),
    // SE2, 6/6S/7/8
    (1334, layout(296, 642, 648, 54, 400, 60, 412, 764)),
    // SE1
    (1136, layout(282, 584, 622, 30, 332, 59, 399, 399)),
    // 11 and XR in display zoom
    (1624, layout(310, 658, 690, 46, 394, 142, 522, 902)),
    // Plus in display zoom
    (2001, layout(444, 963, 1017, 81, 600, 90, 618, 1146)),
    // 12 mini
    (2340, layout(436, 936, 980, 72, 570, 212, 756, 1300)),
];

/// Layout for a screenshot `height` pixels tall.
pub fn phone_layout(height: u32) -> Option<&'static PhoneLayout> {
    PHONES
        .iter()
        .find(|(h, _)| *h == height)
        .map(|(_, layout)| layout)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WidgetSize {
    Small,
    Medium,
    Large,
}

impl fmt::Display for WidgetSize {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Small => "small",
            Self::Medium => "medium",
            Self::Large => "large",
        })
    }
}

impl FromStr for WidgetSize {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "small" => Ok(Self::Small),
            "medium" => Ok(Self::Medium),
            "large" => Ok(Self::Large),
            other => Err(format!("unknown widget size: {other}")),
        }
    }
}

/// Where the widget sits on the home screen.
///
/// Small widgets use the corner/side positions; medium widgets span the row
/// and use `Top`/`Middle`/`Bottom`; large widgets use `Top`/`Bottom`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum WidgetPosition {
    TopLeft,
    TopRight,
    MiddleLeft,
    MiddleRight,
    BottomLeft,
    BottomRight,
    Top,
    Middle,
    Bottom,
}

impl WidgetPosition {
    const fn as_str(self) -> &'static str {
        match self {
            Self::TopLeft => "top-left",
            Self::TopRight => "top-right",
            Self::MiddleLeft => "middle-left",
            Self::MiddleRight => "middle-right",
            Self::BottomLeft => "bottom-left",
            Self::BottomRight => "bottom-right",
            Self::Top => "top",
            Self::Middle => "middle",
            Self::Bottom => "bottom",
        }
    }
}

impl fmt::Display for WidgetPosition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for WidgetPosition {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.to_ascii_lowercase().replace([' ', '_'], "-");
        [
            Self::TopLeft,
            Self::TopRight,
            Self::MiddleLeft,
            Self::MiddleRight,
            Self::BottomLeft,
            Self::BottomRight,
            Self::Top,
            Self::Middle,
            Self::Bottom,
        ]
        .into_iter()
        .find(|position| position.as_str() == normalized)
        .ok_or_else(|| format!("unknown widget position: {s}"))
    }
}

/// Pixel rectangle within a screenshot.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CropRect {
    pub x: u32,
    pub y: u32,
    pub width: u32,
    pub height: u32,
}

/// Crop rectangle for a widget of `size` at `position` on a screen whose
/// screenshot is `screen_height` pixels tall.
pub fn crop_rect(
    screen_height: u32,
    size: WidgetSize,
    position: WidgetPosition,
) -> UiResult<CropRect> {
    use WidgetPosition::*;

    let phone = phone_layout(screen_height).ok_or(UiError::UnknownScreen(screen_height))?;
    let invalid = || UiError::InvalidPosition { size, position };

    let (x, y, width, height) = match size {
        WidgetSize::Small => {
            let x = match position {
                TopLeft | MiddleLeft | BottomLeft => phone.left,
                TopRight | MiddleRight | BottomRight => phone.right,
                _ => return Err(invalid()),
            };
            let y = match position {
                TopLeft | TopRight => phone.top,
                MiddleLeft | MiddleRight => phone.middle,
                _ => phone.bottom,
            };
            (x, y, phone.small, phone.small)
        }
        WidgetSize::Medium => {
            let y = match position {
                Top => phone.top,
                Middle => phone.middle,
                Bottom => phone.bottom,
                _ => return Err(invalid()),
            };
            (phone.left, y, phone.medium, phone.small)
        }
        WidgetSize::Large => {
            let y = match position {
                Top => phone.top,
                Bottom => phone.middle,
                _ => return Err(invalid()),
            };
            (phone.left, y, phone.medium, phone.large)
        }
    };

    Ok(CropRect {
        x,
        y,
        width,
        height,
    })
}

/// Source of a user-selected image.
pub trait PhotoPicker {
    fn pick(&self) -> UiResult<Image>;
}

/// [`PhotoPicker`] that loads a fixed file.
#[derive(Debug, Clone)]
pub struct FilePhotoPicker {
    path: PathBuf,
}

impl FilePhotoPicker {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl PhotoPicker for FilePhotoPicker {
    fn pick(&self) -> UiResult<Image> {
        let bytes = std::fs::read(&self.path)?;
        Ok(Image::from_bytes(&bytes)?)
    }
}

/// Pick a screenshot and cut out the area behind a widget.
pub fn widget_background<P: PhotoPicker + ?Sized>(
    picker: &P,
    size: WidgetSize,
    position: WidgetPosition,
) -> UiResult<Image> {
    let screenshot = picker.pick()?;
    let rect = crop_rect(screenshot.height(), size, position)?;
    debug!(%size, %position, ?rect, "cropping widget background");
    Ok(screenshot.crop(rect.x, rect.y, rect.width, rect.height))
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    struct FixedPicker(Image);

    impl PhotoPicker for FixedPicker {
        fn pick(&self) -> UiResult<Image> {
            Ok(self.0.clone())
        }
    }

    #[test]
    fn test_table_heights_are_unique() {
        for (i, (height, _)) in PHONES.iter().enumerate() {
            assert!(
                PHONES[i + 1..].iter().all(|(other, _)| other != height),
                "duplicate height {height}"
            );
        }
    }

    #[test]
    fn test_small_widget_rects() {
        let rect = crop_rect(2532, WidgetSize::Small, WidgetPosition::TopLeft).unwrap();
        assert_eq!(rect, CropRect { x: 78, y: 231, width: 474, height: 474 });

        let rect = crop_rect(2532, WidgetSize::Small, WidgetPosition::MiddleRight).unwrap();
        assert_eq!((rect.x, rect.y), (618, 819));

        let rect = crop_rect(2532, WidgetSize::Small, WidgetPosition::BottomRight).unwrap();
        assert_eq!((rect.x, rect.y), (618, 1407));
    }

    #[test]
    fn test_medium_widget_rect() {
        let rect = crop_rect(1334, WidgetSize::Medium, WidgetPosition::Middle).unwrap();
        assert_eq!(rect, CropRect { x: 54, y: 412, width: 642, height: 296 });
    }

    #[test]
    fn test_large_widget_bottom_starts_at_middle() {
        let top = crop_rect(2436, WidgetSize::Large, WidgetPosition::Top).unwrap();
        let bottom = crop_rect(2436, WidgetSize::Large, WidgetPosition::Bottom).unwrap();
        assert_eq!(top, CropRect { x: 69, y: 213, width: 987, height: 1035 });
        assert_eq!(bottom.y, 783);
    }

    #[test]
    fn test_invalid_combinations() {
        assert!(matches!(
            crop_rect(1000, WidgetSize::Small, WidgetPosition::TopLeft),
            Err(UiError::UnknownScreen(1000))
        ));
        assert!(matches!(
            crop_rect(2532, WidgetSize::Small, WidgetPosition::Top),
            Err(UiError::InvalidPosition { .. })
        ));
        assert!(matches!(
            crop_rect(2532, WidgetSize::Medium, WidgetPosition::TopLeft),
            Err(UiError::InvalidPosition { .. })
        ));
        assert!(matches!(
            crop_rect(2532, WidgetSize::Large, WidgetPosition::Middle),
            Err(UiError::InvalidPosition { .. })
        ));
    }

    #[test]
    fn test_position_parsing() {
        assert_eq!("top-left".parse::<WidgetPosition>().unwrap(), WidgetPosition::TopLeft);
        assert_eq!("Bottom Right".parse::<WidgetPosition>().unwrap(), WidgetPosition::BottomRight);
        assert_eq!("middle_left".parse::<WidgetPosition>().unwrap(), WidgetPosition::MiddleLeft);
        assert!("center".parse::<WidgetPosition>().is_err());
        assert_eq!("LARGE".parse::<WidgetSize>().unwrap(), WidgetSize::Large);
    }

    #[test]
    fn test_widget_background_crops_screenshot() {
        let picker = FixedPicker(Image::solid(1170, 2532, [10, 20, 30, 255]));
        let background =
            widget_background(&picker, WidgetSize::Medium, WidgetPosition::Top).unwrap();
        assert_eq!(background.size(), (1014, 474));
        assert_eq!(background.pixel(0, 0), [10, 20, 30, 255]);
    }

    #[test]
    fn test_widget_background_unknown_screen() {
        let picker = FixedPicker(Image::solid(10, 10, [0, 0, 0, 255]));
        assert!(matches!(
            widget_background(&picker, WidgetSize::Small, WidgetPosition::TopLeft),
            Err(UiError::UnknownScreen(10))
        ));
    }

    #[test]
    fn test_file_photo_picker() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("shot.png");
        std::fs::write(&path, Image::solid(2, 1334, [0, 0, 0, 255]).to_png().unwrap()).unwrap();

        let image = FilePhotoPicker::new(&path).pick().unwrap();
        assert_eq!(image.height(), 1334);

        assert!(FilePhotoPicker::new(dir.path().join("missing.png")).pick().is_err());
    }
}
