//! The main-window scoring heuristic.
//!
//! Every window owned by the target process tree gets an additive score
//! against the caller's hints; the best qualifying candidate wins. The
//! weights are empirically chosen: their relative order and sign carry the
//! semantics, the magnitudes are tunable.

use std::collections::HashSet;

use tracing::trace;

use crate::window::{DetectionHints, WindowId, WindowSnapshot};

/// Class name equals the hint exactly.
pub const SCORE_CLASS_EXACT: i32 = 100;
/// Class name contains the hint (case-insensitive), short of exact.
pub const SCORE_CLASS_PARTIAL: i32 = 70;
/// Title contains the keyword hint (case-insensitive).
pub const SCORE_TITLE_KEYWORD: i32 = 50;
/// Any non-empty title.
pub const SCORE_HAS_TITLE: i32 = 20;
/// Empty title.
pub const SCORE_EMPTY_TITLE: i32 = -10;
/// Top-level window.
pub const SCORE_TOP_LEVEL: i32 = 30;
/// Child window while the hints allow one.
pub const SCORE_CHILD_ALLOWED: i32 = 15;
/// Taskbar-visible extended style bit present.
pub const SCORE_APP_WINDOW_STYLE: i32 = 40;
/// Window is minimized (still a candidate, just penalized).
pub const SCORE_MINIMIZED: i32 = -20;
/// Qualifying threshold when the hints leave `min_score` unset.
pub const DEFAULT_MIN_SCORE: i32 = 40;

/// One window's outcome in a scoring pass, for the manual-disambiguation
/// read path.
#[derive(Debug, Clone)]
pub struct ScoredWindow {
    /// The window as enumerated.
    pub window: WindowSnapshot,
    /// Additive score; informational when disqualified.
    pub score: i32,
    /// True when the window was skipped rather than scored.
    pub disqualified: bool,
}

/// A cloaked window that is neither visible nor minimized does not exist
/// as far as selection is concerned; likewise a child window when the
/// hints forbid children.
fn disqualified(w: &WindowSnapshot, hints: &DetectionHints) -> bool {
    if w.cloaked && !w.is_visible && !w.is_minimized {
        return true;
    }
    !w.is_top_level() && !hints.allow_non_top_level
}

/// The raw additive score, computed independently of disqualification.
fn raw_score(w: &WindowSnapshot, hints: &DetectionHints) -> i32 {
    let mut score = 0;

    if !hints.primary_class.is_empty() {
        if w.class_name == hints.primary_class {
            score += SCORE_CLASS_EXACT;
        } else if w
            .class_name
            .to_lowercase()
            .contains(&hints.primary_class.to_lowercase())
        {
            score += SCORE_CLASS_PARTIAL;
        }
    }

    if !hints.title_contains.is_empty()
        && w.title
            .to_lowercase()
            .contains(&hints.title_contains.to_lowercase())
    {
        score += SCORE_TITLE_KEYWORD;
    }

    if w.title.is_empty() {
        score += SCORE_EMPTY_TITLE;
    } else {
        score += SCORE_HAS_TITLE;
    }

    if w.is_top_level() {
        score += SCORE_TOP_LEVEL;
    } else if hints.allow_non_top_level {
        score += SCORE_CHILD_ALLOWED;
    }

    if w.has_app_window_style() {
        score += SCORE_APP_WINDOW_STYLE;
    }

    if w.is_minimized {
        score += SCORE_MINIMIZED;
    }

    score
}

/// Score one window, or `None` when it is disqualified outright.
pub fn score_window(w: &WindowSnapshot, hints: &DetectionHints) -> Option<i32> {
    if disqualified(w, hints) {
        return None;
    }
    Some(raw_score(w, hints))
}

/// Find the most likely main window among `windows` for the given process
/// set.
///
/// Returns the strictly best-scoring candidate at or above the threshold,
/// or `(None, -1)` when nothing qualifies. Ties keep the first window
/// encountered; enumeration order is not contractual, so callers should
/// supply hints specific enough to make ties rare.
pub fn find_best_window(
    windows: &[WindowSnapshot],
    pids: &HashSet<u32>,
    hints: &DetectionHints,
) -> (Option<WindowId>, i32) {
    let min_score = hints.min_score.unwrap_or(DEFAULT_MIN_SCORE);
    let mut best: Option<(WindowId, i32)> = None;
    for w in windows.iter().filter(|w| pids.contains(&w.pid)) {
        let Some(score) = score_window(w, hints) else {
            continue;
        };
        trace!(hwnd = w.hwnd, class = %w.class_name, score, "scored");
        if score < min_score {
            continue;
        }
        if best.is_none_or(|(_, s)| score > s) {
            best = Some((w.hwnd, score));
        }
    }
    match best {
        Some((hwnd, score)) => (Some(hwnd), score),
        None => (None, -1),
    }
}

/// The companion read path: every window considered for the process set,
/// scored or marked disqualified, for manual disambiguation when no
/// automatic winner emerges.
pub fn survey(
    windows: &[WindowSnapshot],
    pids: &HashSet<u32>,
    hints: &DetectionHints,
) -> Vec<ScoredWindow> {
    windows
        .iter()
        .filter(|w| pids.contains(&w.pid))
        .map(|w| ScoredWindow {
            window: w.clone(),
            score: raw_score(w, hints),
            disqualified: disqualified(w, hints),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn snapshot(class: &str, title: &str) -> WindowSnapshot {
        WindowSnapshot {
            hwnd: 1,
            class_name: class.into(),
            title: title.into(),
            pid: 10,
            parent: None,
            is_visible: true,
            is_minimized: false,
            ex_style: 0,
            cloaked: false,
        }
    }

    fn hints(class: &str) -> DetectionHints {
        DetectionHints {
            primary_class: class.into(),
            ..DetectionHints::default()
        }
    }

    fn pids() -> HashSet<u32> {
        [10].into_iter().collect()
    }

    #[test]
    fn exact_class_titled_toplevel_taskbar() {
        // Class exact (100) + title (20) + top-level (30) + style (40).
        let mut w = snapshot("OpusApp", "Document1 - WPS");
        w.ex_style = crate::window::WS_EX_APPWINDOW;
        let h = DetectionHints {
            primary_class: "OpusApp".into(),
            title_contains: String::new(),
            allow_non_top_level: false,
            min_score: Some(40),
        };
        assert_eq!(score_window(&w, &h), Some(190));
        let (best, score) = find_best_window(&[w.clone()], &pids(), &h);
        assert_eq!(best, Some(w.hwnd));
        assert_eq!(score, 190);
    }

    #[test]
    fn child_disqualified_when_disallowed() {
        let mut w = snapshot("OpusApp", "Document1 - WPS");
        w.ex_style = crate::window::WS_EX_APPWINDOW;
        w.parent = Some(99);
        let h = DetectionHints {
            primary_class: "OpusApp".into(),
            allow_non_top_level: false,
            ..DetectionHints::default()
        };
        assert_eq!(score_window(&w, &h), None);
        assert_eq!(find_best_window(&[w], &pids(), &h), (None, -1));
    }

    #[test]
    fn child_allowed_scores_reduced_topology_bonus() {
        let mut w = snapshot("Chrome_WidgetWin_1", "App");
        w.parent = Some(99);
        let h = hints("Chrome_WidgetWin_1");
        // 100 class + 20 title + 15 child.
        assert_eq!(score_window(&w, &h), Some(135));
    }

    #[test]
    fn cloaked_hidden_window_never_selected() {
        let mut w = snapshot("OpusApp", "Document1");
        w.cloaked = true;
        w.is_visible = false;
        let h = hints("OpusApp");
        assert_eq!(score_window(&w, &h), None);
        assert_eq!(find_best_window(&[w], &pids(), &h), (None, -1));
    }

    #[test]
    fn cloaked_but_minimized_still_scored() {
        let mut w = snapshot("OpusApp", "Document1");
        w.cloaked = true;
        w.is_minimized = true;
        let h = hints("OpusApp");
        // 100 class + 20 title + 30 top-level - 20 minimized.
        assert_eq!(score_window(&w, &h), Some(130));
    }

    #[test]
    fn partial_class_match_case_insensitive() {
        let w = snapshot("MyOpusAppFrame", "x");
        let h = hints("opusapp");
        // 70 partial + 20 title + 30 top-level.
        assert_eq!(score_window(&w, &h), Some(120));
    }

    #[test]
    fn empty_title_penalized() {
        let w = snapshot("OpusApp", "");
        let h = hints("OpusApp");
        // 100 class - 10 empty + 30 top-level.
        assert_eq!(score_window(&w, &h), Some(120));
    }

    #[test]
    fn title_keyword_bonus() {
        let w = snapshot("Shell", "Main Dashboard");
        let h = DetectionHints {
            title_contains: "dashboard".into(),
            ..DetectionHints::default()
        };
        // 50 keyword + 20 title + 30 top-level.
        assert_eq!(score_window(&w, &h), Some(100));
    }

    #[test]
    fn below_threshold_yields_null() {
        // Untitled child with no matching hints never reaches the default
        // threshold of 40.
        let mut w = snapshot("tooltips_class32", "");
        w.parent = Some(99);
        let h = DetectionHints::default();
        let got = score_window(&w, &h);
        assert_eq!(got, Some(SCORE_EMPTY_TITLE + SCORE_CHILD_ALLOWED));
        assert_eq!(find_best_window(&[w], &pids(), &h), (None, -1));
    }

    #[test]
    fn best_score_wins_and_result_meets_threshold() {
        let strong = WindowSnapshot {
            hwnd: 2,
            ..snapshot("OpusApp", "Document1")
        };
        let weak = WindowSnapshot {
            hwnd: 3,
            ..snapshot("MsoSplash", "")
        };
        let other_pid = WindowSnapshot {
            hwnd: 4,
            pid: 999,
            ..snapshot("OpusApp", "Document1")
        };
        let h = hints("OpusApp");
        let (best, score) = find_best_window(&[weak, other_pid, strong], &pids(), &h);
        assert_eq!(best, Some(2));
        assert!(score >= DEFAULT_MIN_SCORE);
        assert_eq!(score, 150);
    }

    #[test]
    fn survey_lists_disqualified_windows_too() {
        let mut cloaked = snapshot("Ghost", "");
        cloaked.cloaked = true;
        cloaked.is_visible = false;
        let normal = WindowSnapshot {
            hwnd: 2,
            ..snapshot("OpusApp", "Doc")
        };
        let h = hints("OpusApp");
        let rows = survey(&[cloaked, normal], &pids(), &h);
        assert_eq!(rows.len(), 2);
        assert!(rows[0].disqualified);
        assert!(!rows[1].disqualified);
        assert_eq!(rows[1].score, 150);
    }
}
