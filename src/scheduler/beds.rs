//! Round-robin bed allocation.
//!
//! Beds are assigned by position only: patient `i` gets bed
//! `(i mod beds) + 1`, or bed 1 when there are no beds. There is no
//! capacity check, so patients may share a bed number.

use crate::models::Schedule;

/// Bed (1-based) for the patient at `position` (0-based).
#[inline]
pub fn bed_for(position: usize, bed_count: usize) -> usize {
    if bed_count == 0 {
        1
    } else {
        position % bed_count + 1
    }
}

/// Writes a bed into every schedule entry.
pub fn allocate_beds(schedule: &mut Schedule, bed_count: usize) {
    for entry in schedule.entries.iter_mut() {
        entry.bed = bed_for(entry.patient_index, bed_count);
    }
}
