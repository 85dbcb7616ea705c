//! Solver statistics and progress logging.

use std::time::Instant;

use matrioshka_core::{SearchObserver, Value};
use tracing::info;

/// Max plies in a Matrioshka game (both inventories emptied).
const MAX_PLIES: usize = 12;

/// Resident set size of this process in bytes, if the platform reports it.
#[cfg(target_os = "macos")]
pub fn memory_usage() -> Option<u64> {
    use std::mem::MaybeUninit;

    extern "C" {
        fn mach_task_self() -> u32;
        fn task_info(
            target_task: u32,
            flavor: i32,
            task_info_out: *mut libc::c_void,
            task_info_out_count: *mut u32,
        ) -> i32;
    }

    #[repr(C)]
    struct TaskBasicInfo {
        suspend_count: i32,
        virtual_size: u64,
        resident_size: u64,
        user_time: (i32, i32),
        system_time: (i32, i32),
        policy: i32,
    }

    const TASK_BASIC_INFO_64: i32 = 5;
    const TASK_BASIC_INFO_64_COUNT: u32 = 10;

    let mut info = MaybeUninit::<TaskBasicInfo>::uninit();
    let mut count = TASK_BASIC_INFO_64_COUNT;
    // SAFETY: task_info fills at most `count` words of `info` and reports
    // success with 0, after which `info` is initialized.
    unsafe {
        let status = task_info(
            mach_task_self(),
            TASK_BASIC_INFO_64,
            info.as_mut_ptr() as *mut libc::c_void,
            &mut count,
        );
        (status == 0).then(|| info.assume_init().resident_size)
    }
}

#[cfg(target_os = "linux")]
pub fn memory_usage() -> Option<u64> {
    let status = std::fs::read_to_string("/proc/self/status").ok()?;
    let line = status.lines().find(|line| line.starts_with("VmRSS:"))?;
    let kb: u64 = line.split_whitespace().nth(1)?.parse().ok()?;
    Some(kb * 1024)
}

#[cfg(not(any(target_os = "macos", target_os = "linux")))]
pub fn memory_usage() -> Option<u64> {
    None
}

/// Human-readable byte count.
pub fn format_bytes(bytes: u64) -> String {
    const KB: u64 = 1024;
    const MB: u64 = KB * 1024;
    const GB: u64 = MB * 1024;

    if bytes >= GB {
        format!("{:.2} GB", bytes as f64 / GB as f64)
    } else if bytes >= MB {
        format!("{:.1} MB", bytes as f64 / MB as f64)
    } else if bytes >= KB {
        format!("{:.1} KB", bytes as f64 / KB as f64)
    } else {
        format!("{} B", bytes)
    }
}

/// Counters collected while solving, with periodic progress lines.
#[derive(Debug)]
pub struct SolverStats {
    /// Positions whose successors were generated
    pub expanded: u64,

    /// Positions answered from the transposition table
    pub cache_hits: u64,

    /// Leaves decided without expansion, by value
    pub a_wins: u64,
    pub b_wins: u64,
    pub draws: u64,

    /// Table entries written, by depth
    pub stored_by_depth: [u64; MAX_PLIES + 1],

    /// Deepest expanded position
    pub max_depth: u8,

    table_len: usize,
    log_interval_secs: u64,
    start_time: Instant,
    last_log_time: Instant,
    last_log_expanded: u64,
}

impl SolverStats {
    pub fn new(log_interval_secs: u64) -> Self {
        let now = Instant::now();
        Self {
            expanded: 0,
            cache_hits: 0,
            a_wins: 0,
            b_wins: 0,
            draws: 0,
            stored_by_depth: [0; MAX_PLIES + 1],
            max_depth: 0,
            table_len: 0,
            log_interval_secs,
            start_time: now,
            last_log_time: now,
            last_log_expanded: 0,
        }
    }

    pub fn terminals(&self) -> u64 {
        self.a_wins + self.b_wins + self.draws
    }

    pub fn stored(&self) -> u64 {
        self.stored_by_depth.iter().sum()
    }

    pub fn expanded_per_sec(&self) -> f64 {
        let elapsed = self.start_time.elapsed().as_secs_f64();
        if elapsed > 0.0 {
            self.expanded as f64 / elapsed
        } else {
            0.0
        }
    }

    fn should_log(&self) -> bool {
        self.last_log_time.elapsed().as_secs() >= self.log_interval_secs
    }

    /// Log one progress line and reset the rate window.
    pub fn log_progress(&mut self) {
        let elapsed_total = self.start_time.elapsed().as_secs();
        let window = self.last_log_time.elapsed().as_secs_f64();
        let rate = if window > 0.0 {
            (self.expanded - self.last_log_expanded) as f64 / window
        } else {
            0.0
        };
        let mem = memory_usage().map(format_bytes).unwrap_or_else(|| "?".into());

        info!(
            elapsed = %format!(
                "{:02}:{:02}:{:02}",
                elapsed_total / 3600,
                (elapsed_total % 3600) / 60,
                elapsed_total % 60
            ),
            expanded = self.expanded,
            unique = self.table_len,
            cache_hits = self.cache_hits,
            rate = %format!("{:.0}/s", rate),
            depth = self.max_depth,
            mem = %mem,
            "progress"
        );
        info!(a = self.a_wins, b = self.b_wins, draw = self.draws, "terminals");

        self.last_log_time = Instant::now();
        self.last_log_expanded = self.expanded;
    }

    /// Log the final counters.
    pub fn log_summary(&self) {
        info!("Positions expanded: {}", self.expanded);
        info!("Cache hits: {}", self.cache_hits);
        info!("Leaves: {}", self.terminals());
        info!("  - A wins: {}", self.a_wins);
        info!("  - B wins: {}", self.b_wins);
        info!("  - Draws (no move): {}", self.draws);
        info!("Stored: {}", self.stored());
        for (depth, &count) in self.stored_by_depth.iter().enumerate() {
            if count > 0 {
                info!("  - depth {:>2}: {}", depth, count);
            }
        }
        info!("Max depth: {}", self.max_depth);
        info!("Average rate: {:.0} positions/sec", self.expanded_per_sec());
    }
}

impl SearchObserver for SolverStats {
    fn on_expand(&mut self, depth: u8) {
        self.expanded += 1;
        self.max_depth = self.max_depth.max(depth);
    }

    fn on_cache_hit(&mut self, _depth: u8) {
        self.cache_hits += 1;
    }

    fn on_terminal(&mut self, _depth: u8, value: Value) {
        match value {
            Value::Win => self.a_wins += 1,
            Value::Loss => self.b_wins += 1,
            Value::Draw => self.draws += 1,
        }
    }

    fn on_stored(&mut self, depth: u8, _value: Value, table_len: usize) {
        if let Some(slot) = self.stored_by_depth.get_mut(depth as usize) {
            *slot += 1;
        }
        self.table_len = table_len;
        if self.should_log() {
            self.log_progress();
        }
    }
}
