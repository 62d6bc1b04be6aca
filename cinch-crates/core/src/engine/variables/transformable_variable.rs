/// Creates affine views on top of a variable.
pub trait TransformableVariable<View> {
    /// The view `scale * self`.
    ///
    /// Scaling keeps the holes: the view of `{1, 2}` scaled by 2 is `{2, 4}`, and narrowing it to
    /// `3` empties the domain.
    fn scaled(&self, scale: i32) -> View;

    /// The view `self + offset`.
    fn offset(&self, offset: i32) -> View;
}
