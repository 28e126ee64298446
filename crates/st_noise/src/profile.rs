/// Surface height and middle thickness for every column of one generation
/// pass. Built once and read-only afterwards.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ColumnProfile {
    base_height: i32,
    surface: Vec<i32>,
    middle: Vec<i32>,
}

impl ColumnProfile {
    /// Both vectors must have one entry per column.
    pub fn new(base_height: i32, surface: Vec<i32>, middle: Vec<i32>) -> Self {
        debug_assert_eq!(
            surface.len(),
            middle.len(),
            "column profile channels must have equal length"
        );
        Self {
            base_height,
            surface,
            middle,
        }
    }

    pub fn width(&self) -> usize {
        self.surface.len()
    }

    pub fn is_empty(&self) -> bool {
        self.surface.is_empty()
    }

    pub fn base_height(&self) -> i32 {
        self.base_height
    }

    /// Surface height of column `x`.
    ///
    /// Columns outside `[0, width)` return `0`, which is indistinguishable
    /// from a real height of zero. Use [`Self::contains`] to tell them apart.
    pub fn surface_height(&self, x: i32) -> i32 {
        self.column(x).map_or(0, |i| self.surface[i])
    }

    /// Middle thickness of column `x`, `0` outside the profile.
    pub fn middle_thickness(&self, x: i32) -> i32 {
        self.column(x).map_or(0, |i| self.middle[i])
    }

    pub fn contains(&self, x: i32) -> bool {
        self.column(x).is_some()
    }

    pub fn surface_heights(&self) -> &[i32] {
        &self.surface
    }

    pub fn middle_thicknesses(&self) -> &[i32] {
        &self.middle
    }

    /// Iterate `(x, surface_height)` left to right.
    pub fn columns(&self) -> impl Iterator<Item = (i32, i32)> + '_ {
        self.surface.iter().enumerate().map(|(x, &h)| (x as i32, h))
    }

    fn column(&self, x: i32) -> Option<usize> {
        usize::try_from(x).ok().filter(|&i| i < self.surface.len())
    }
}
