//! 代理日志存储
//! 使用内存环形缓冲区记录最近的上游调用

use serde::{Deserialize, Serialize};
use std::collections::VecDeque;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};

/// One outbound marketplace call
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProxyLogEntry {
    pub id: u64,
    pub timestamp: i64,
    pub method: String,
    pub url: String,
    /// 0 when the call never got a response
    pub status_code: u16,
    pub latency_ms: u32,
    pub error: Option<String>,
}

/// Longest error text kept per entry, in bytes
pub const MAX_ERROR_LEN: usize = 1024;

fn truncate_error(mut error: String) -> String {
    if error.len() > MAX_ERROR_LEN {
        let mut end = MAX_ERROR_LEN;
        while !error.is_char_boundary(end) {
            end -= 1;
        }
        error.truncate(end);
        error.push_str("...");
    }
    error
}

pub struct LogStore {
    logs: RwLock<VecDeque<ProxyLogEntry>>,
    max_size: usize,
    next_id: AtomicU64,
}

impl LogStore {
    pub fn new(max_size: usize) -> Self {
        let max_size = max_size.max(1);
        Self {
            logs: RwLock::new(VecDeque::with_capacity(max_size)),
            max_size,
            next_id: AtomicU64::new(1),
        }
    }

    // Poisoned locks are recovered; every write is a single push or pop.
    fn read(&self) -> RwLockReadGuard<'_, VecDeque<ProxyLogEntry>> {
        self.logs.read().unwrap_or_else(|e| e.into_inner())
    }

    fn write(&self) -> RwLockWriteGuard<'_, VecDeque<ProxyLogEntry>> {
        self.logs.write().unwrap_or_else(|e| e.into_inner())
    }

    pub fn record(
        &self,
        method: String,
        url: String,
        status_code: u16,
        latency_ms: u32,
        error: Option<String>,
    ) {
        let entry = ProxyLogEntry {
            id: self.next_id.fetch_add(1, Ordering::SeqCst),
            timestamp: chrono::Utc::now().timestamp(),
            method,
            url,
            status_code,
            latency_ms,
            error: error.map(truncate_error),
        };

        let mut logs = self.write();
        if logs.len() >= self.max_size {
            logs.pop_front();
        }
        logs.push_back(entry);
    }

    /// Newest first
    pub fn get_logs(&self, limit: usize, offset: usize) -> Vec<ProxyLogEntry> {
        self.read()
            .iter()
            .rev()
            .skip(offset)
            .take(limit)
            .cloned()
            .collect()
    }

    pub fn len(&self) -> usize {
        self.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.read().is_empty()
    }

    pub fn clear(&self) {
        self.write().clear();
    }
}

impl Default for LogStore {
    fn default() -> Self {
        Self::new(500)
    }
}
