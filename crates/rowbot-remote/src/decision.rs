/// Chooses a move from the current position.
///
/// `inputs` is the board as a flat row-major sequence of `size * size` signed values
/// (`+1` ours, `-1` opponent, `0` empty). The result is a 1-based column index; values
/// outside `1..=size` are clamped by the session before sending.
pub trait DecisionFunction {
    fn choose_column(&self, inputs: &[i8]) -> usize;
}

impl<F> DecisionFunction for F
where
    F: Fn(&[i8]) -> usize,
{
    fn choose_column(&self, inputs: &[i8]) -> usize {
        self(inputs)
    }
}
