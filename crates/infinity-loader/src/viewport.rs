/// Geometry of the scrollable area the loader element lives in.
///
/// The embedding UI supplies this; the loader only compares the two
/// measurements to decide whether freshly rendered content has filled the
/// visible area. Both are in pixels. For a windowed page the client height
/// is the window's inner height; for an explicit scrollable container it is
/// that element's client height.
pub trait ScrollViewport: Send + Sync {
    /// Height of the scrollable container (or window).
    fn client_height(&self) -> u32;

    /// Document offset of the loader element measured from the top of the
    /// scrollable content. Grows as records are rendered above it.
    fn loader_offset_top(&self) -> u32;
}
