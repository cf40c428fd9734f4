/// Exponential spin between retries of a contended CAS loop.
#[inline]
pub(crate) fn backoff(step: &mut usize) {
    if *step < 6 {
        (0..1 << *step).for_each(|_| core::hint::spin_loop());
        *step += 1;
    } else {
        // Capped.
        (0..1 << 6).for_each(|_| core::hint::spin_loop());
    }
}
