//! Process liveness and parent/child queries via the Toolhelp snapshot.

use tracing::warn;
use windows::Win32::{
    Foundation::CloseHandle,
    System::Diagnostics::ToolHelp::{
        CreateToolhelp32Snapshot, PROCESSENTRY32W, Process32FirstW, Process32NextW,
        TH32CS_SNAPPROCESS,
    },
};

/// One row from the system process table.
struct ProcessEntry {
    pid: u32,
    parent: u32,
    image: String,
}

/// One pass over the system process table.
fn snapshot_processes() -> Vec<ProcessEntry> {
    let mut out = Vec::new();
    unsafe {
        let snap = match CreateToolhelp32Snapshot(TH32CS_SNAPPROCESS, 0) {
            Ok(h) => h,
            Err(e) => {
                warn!(err = %e, "process snapshot failed");
                return out;
            }
        };
        let mut entry = PROCESSENTRY32W {
            dwSize: std::mem::size_of::<PROCESSENTRY32W>() as u32,
            ..Default::default()
        };
        if Process32FirstW(snap, &mut entry).is_ok() {
            loop {
                let len = entry
                    .szExeFile
                    .iter()
                    .position(|&c| c == 0)
                    .unwrap_or(entry.szExeFile.len());
                out.push(ProcessEntry {
                    pid: entry.th32ProcessID,
                    parent: entry.th32ParentProcessID,
                    image: String::from_utf16_lossy(&entry.szExeFile[..len]),
                });
                if Process32NextW(snap, &mut entry).is_err() {
                    break;
                }
            }
        }
        let _ = CloseHandle(snap);
    }
    out
}

/// True while `pid` appears in the process table.
pub(crate) fn process_alive(pid: u32) -> bool {
    snapshot_processes().iter().any(|e| e.pid == pid)
}

/// Direct children of `pid`.
pub(crate) fn child_pids(pid: u32) -> Vec<u32> {
    snapshot_processes()
        .into_iter()
        .filter(|e| e.parent == pid)
        .map(|e| e.pid)
        .collect()
}

/// Processes whose executable image matches `image` (case-insensitive).
pub(crate) fn pids_for_image(image: &str) -> Vec<u32> {
    let wanted = image.to_lowercase();
    snapshot_processes()
        .into_iter()
        .filter(|e| e.image.to_lowercase() == wanted)
        .map(|e| e.pid)
        .collect()
}
