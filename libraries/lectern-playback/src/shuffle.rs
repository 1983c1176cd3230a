//! Random lecture selection for shuffle mode

use rand::Rng;

/// Pick a uniformly random index in `0..len` other than `current`
///
/// With no current index any position may be picked. Returns `None` when
/// there is nothing else to pick.
pub fn pick_other<R: Rng + ?Sized>(rng: &mut R, len: usize, current: Option<usize>) -> Option<usize> {
    match current {
        None if len > 0 => Some(rng.gen_range(0..len)),
        Some(current) if len > 1 && current < len => {
            // Draw from len - 1 slots and skip over the current one
            let pick = rng.gen_range(0..len - 1);
            Some(if pick >= current { pick + 1 } else { pick })
        }
        _ => None,
    }
}
