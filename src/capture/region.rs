//! Screen rectangles for targeted capture

use std::fmt;

/// An absolute rectangle on screen (or inside a screenshot)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Region {
    pub x: u32,
    pub y: u32,
    pub width: u32,
    pub height: u32,
}

impl Region {
    pub fn new(x: u32, y: u32, width: u32, height: u32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Parse a region from "x,y,width,height"
    pub fn parse(region_str: &str) -> Option<Self> {
        let parts: Vec<&str> = region_str.split(',').collect();
        if parts.len() == 4
            && let (Ok(x), Ok(y), Ok(width), Ok(height)) = (
                parts[0].trim().parse::<u32>(),
                parts[1].trim().parse::<u32>(),
                parts[2].trim().parse::<u32>(),
                parts[3].trim().parse::<u32>(),
            )
        {
            return Some(Region::new(x, y, width, height));
        }
        None
    }

    /// Whether the whole region lies inside a frame of the given size
    pub fn fits_within(&self, frame_width: u32, frame_height: u32) -> bool {
        self.x as u64 + self.width as u64 <= frame_width as u64
            && self.y as u64 + self.height as u64 <= frame_height as u64
    }

    /// Check if this region is valid (non-zero dimensions)
    pub fn is_valid(&self) -> bool {
        self.width > 0 && self.height > 0
    }
}

impl fmt::Display for Region {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{},{},{},{}]", self.x, self.y, self.width, self.height)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_region() {
        let region = Region::parse("300, 1682,50,50").unwrap();
        assert_eq!(region, Region::new(300, 1682, 50, 50));
        assert!(Region::parse("1,2,3").is_none());
        assert!(Region::parse("a,b,c,d").is_none());
    }

    #[test]
    fn test_fits_within() {
        assert!(Region::new(0, 0, 100, 10).fits_within(100, 10));
        assert!(!Region::new(1, 0, 100, 10).fits_within(100, 10));
        assert!(!Region::new(u32::MAX, 0, 2, 1).fits_within(100, 10));
    }

    #[test]
    fn test_validity_and_display() {
        let region = Region::new(10, 10, 5, 5);
        assert!(region.is_valid());
        assert!(!Region::new(0, 0, 0, 5).is_valid());
        assert_eq!(region.to_string(), "[10,10,5,5]");
    }
}
