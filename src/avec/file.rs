//! Whole-log decoding over a pool of workers.
//!
//! _Requires Cargo feature `std`._
//!
//! Sectors are independent of one another, so each worker reads the sectors
//! it is handed through its own file handle. Outcomes are merged back into
//! sector order.

use std::{fs::File, io, path::Path, string::String, vec::Vec};

use crossbeam::channel;
use tracing::{debug, info, warn};

use crate::sans::check::Checksum;

use super::{
    reader::{self, Error},
    report::SectorReport,
    slice::Summary,
};

extern crate std;

/// The outcome of decoding one sector of a log.
#[derive(Debug)]
pub struct SectorOutcome {
    pub index: u32,
    /// The decoding summary, or why the sector was skipped.
    pub result: Result<Summary, Error>,
    /// The rendered sector, empty if the sector was skipped.
    pub report: String,
}

/// Decode and render every whole sector of the log at `path`, using up to
/// `jobs` workers.
///
/// A sector failing to decode is reported in its outcome, and never stops the
/// others. Fails only if the log cannot be opened or measured.
///
/// This method is also re-exported as `mtklog::avec::decode_file`.
pub fn decode<C: Checksum + Sync + ?Sized>(
    path: &Path,
    jobs: usize,
    check: &C,
) -> io::Result<Vec<SectorOutcome>> {
    let count = reader::sector_count(&mut File::open(path)?)?;
    let jobs = jobs.clamp(1, count.max(1) as usize);

    info!(path = %path.display(), count, jobs, "decoding log");

    // Queue every index, then close the queue.
    let work_rx = {
        let (work_tx, work_rx) = channel::bounded(count as usize);
        for index in 0..count {
            work_tx
                .try_send(index)
                .map_err(|_| io::Error::other("sector queue rejected an index"))?;
        }
        work_rx
    };
    let (done_tx, done_rx) = channel::unbounded();

    crossbeam::thread::scope(|s| {
        for _ in 0..jobs {
            let work_rx = work_rx.clone();
            let done_tx = done_tx.clone();

            s.spawn(move |_| {
                let mut file: Option<File> = None;

                for index in work_rx.iter() {
                    let opened = match file.take() {
                        Some(f) => Ok(f),
                        None => File::open(path),
                    };

                    let outcome = match opened {
                        Ok(mut f) => {
                            let outcome = decode_sector(&mut f, index, check);
                            file = Some(f);
                            outcome
                        }
                        Err(err) => skipped(index, err.into()),
                    };

                    if done_tx.send(outcome).is_err() {
                        break;
                    }
                }
            });
        }
    })
    .map_err(|_| io::Error::other("sector worker panicked"))?;

    drop(done_tx);

    let mut outcomes: Vec<_> = done_rx.iter().collect();
    outcomes.sort_by_key(|o| o.index);

    Ok(outcomes)
}

fn decode_sector<C: Checksum + ?Sized>(f: &mut File, index: u32, check: &C) -> SectorOutcome {
    let mut report = SectorReport::new();

    match reader::decode(f, index, &mut report, check) {
        Ok(summary) => {
            debug!(index, accepted = summary.accepted, "sector rendered");
            SectorOutcome {
                index,
                result: Ok(summary),
                report: report.into_string(),
            }
        }
        Err(err) => skipped(index, err),
    }
}

fn skipped(index: u32, err: Error) -> SectorOutcome {
    warn!(index, %err, "sector skipped");
    SectorOutcome {
        index,
        result: Err(err),
        report: String::new(),
    }
}
