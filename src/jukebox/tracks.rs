use rand::Rng;

/// Random starting track, `None` when there is nothing to play.
pub fn pick_initial<T, R: Rng + ?Sized>(playlist: &[T], rng: &mut R) -> Option<usize> {
    if playlist.is_empty() {
        return None;
    }
    Some(rng.gen_range(0..playlist.len()))
}

/// Next track index. Playlists wrap around and never run out.
pub fn advance(index: usize, len: usize) -> usize {
    if len == 0 {
        return 0;
    }
    (index + 1) % len
}
