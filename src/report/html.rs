//! Renders the season's gaps into one self-contained HTML page.
//!
//! The page carries the full [`GapReport`] inline as JSON, so it renders
//! offline with no server. Filtering, month grouping, and the handled
//! checklist (localStorage) all run client-side. Feed-derived strings are
//! escaped both where they land in markup and inside the embedded JSON,
//! since cabin names and picture URLs come from an external service.

use anyhow::Result;
use base64::{engine::general_purpose::STANDARD, Engine as _};
use chrono::Datelike;
use serde_json::json;

use crate::models::gap::GapReport;

const THEME_COLOR: &str = "#296DA8";
const BACKGROUND_COLOR: &str = "#FFFEF8";

/// Build the full report page for one season.
pub fn render_report(report: &GapReport, property_name: &str) -> Result<String> {
    let data = embedded_data(report)?;
    let title = escape_html(property_name);
    let subtitle = season_subtitle(report);

    Ok(format!(
        r##"<!DOCTYPE html>
<html lang="en">
<head>
<meta charset="UTF-8">
<meta name="viewport" content="width=device-width, initial-scale=1.0">
<title>Gap Nights — {title}</title>
<link rel="manifest" href="{manifest}">
<meta name="theme-color" content="{theme}">
<style>{style}</style>
</head>
<body>
<header>
  <h1><strong>Gap Nights</strong> — {title}</h1>
  <div class="subtitle">{subtitle}</div>
</header>
<div class="stats">
  <div class="stat"><div class="num" id="total">—</div><div class="label">Total Gaps</div></div>
  <div class="stat"><div class="num done" id="done">0</div><div class="label">Handled</div></div>
  <div class="stat"><div class="num" id="remaining">—</div><div class="label">Remaining</div></div>
</div>
<div class="progress-bar"><div class="fill" id="progress" style="width:0%"></div></div>
<div class="filters">
  <label>Nights:</label>
  <button class="filter-btn active" data-filter="all">All</button>
  <button class="filter-btn" data-filter="1">1-Night</button>
  <button class="filter-btn" data-filter="2">2-Night</button>
  <button class="filter-btn" data-filter="3">3-Night</button>
</div>
<div id="list"></div>
<footer>
  <div>Generated <span id="generated"></span></div>
  <div>Data from innroad booking engine</div>
</footer>
<script>
const DATA = {data};
{script}</script>
</body>
</html>
"##,
        title = title,
        manifest = manifest_href(),
        theme = THEME_COLOR,
        style = STYLE,
        subtitle = subtitle,
        data = data,
        script = CLIENT_SCRIPT,
    ))
}

/// Report JSON ready for a `<script>` block. `</` is escaped so feed
/// strings can never terminate the block early.
fn embedded_data(report: &GapReport) -> Result<String> {
    Ok(serde_json::to_string(report)?.replace("</", "<\\/"))
}

/// Minimal PWA manifest inlined as a data: URL so the page stays a single
/// file.
fn manifest_href() -> String {
    let manifest = json!({
        "name": "Gap Nights",
        "short_name": "Gaps",
        "start_url": ".",
        "display": "standalone",
        "background_color": BACKGROUND_COLOR,
        "theme_color": THEME_COLOR,
    });
    format!(
        "data:application/json;base64,{}",
        STANDARD.encode(manifest.to_string())
    )
}

fn season_subtitle(report: &GapReport) -> String {
    format!(
        "{} Season: {} – {}",
        report.season_start.year(),
        report.season_start.format("%b %-d"),
        report.season_end.format("%b %-d")
    )
}

fn escape_html(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    for ch in raw.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(ch),
        }
    }
    out
}

const STYLE: &str = r##"
  @import url('https://fonts.googleapis.com/css2?family=Inter:wght@300;400;500;600&display=swap');
  * { margin: 0; padding: 0; box-sizing: border-box; }
  :root {
    --blue: #296DA8; --blue-light: #40AADC; --burgundy: #8D2C3B;
    --cream: #FFFEF8; --sand: #F5F0E8; --text: #2C3E50;
    --text-light: #6B7C8D; --green: #2D8A56; --border: #E0D8CC;
  }
  body { font-family: 'Inter', -apple-system, sans-serif; background: var(--cream); color: var(--text); line-height: 1.5; }

  header { background: linear-gradient(135deg, var(--blue) 0%, #1E4D7B 100%); color: white; padding: 2rem 1.5rem; text-align: center; }
  header h1 { font-weight: 300; font-size: 1.6rem; letter-spacing: 0.02em; }
  header h1 strong { font-weight: 600; }
  header .subtitle { font-size: 0.85rem; opacity: 0.8; margin-top: 0.3rem; }

  .stats { display: flex; justify-content: center; gap: 2rem; padding: 1.2rem 1.5rem; background: var(--sand); border-bottom: 1px solid var(--border); flex-wrap: wrap; }
  .stat { text-align: center; }
  .stat .num { font-size: 1.8rem; font-weight: 600; color: var(--blue); }
  .stat .num.done { color: var(--green); }
  .stat .label { font-size: 0.7rem; text-transform: uppercase; letter-spacing: 0.08em; color: var(--text-light); }

  .progress-bar { height: 4px; background: var(--border); }
  .progress-bar .fill { height: 100%; background: var(--green); transition: width 0.3s ease; }

  .filters { display: flex; gap: 0.5rem; padding: 1rem 1.5rem; flex-wrap: wrap; align-items: center; }
  .filters label { font-size: 0.75rem; color: var(--text-light); text-transform: uppercase; letter-spacing: 0.05em; margin-right: 0.3rem; }

  .filter-btn {
    padding: 0.3rem 0.7rem; border: 1px solid var(--border); border-radius: 1rem;
    background: white; font-size: 0.8rem; cursor: pointer; color: var(--text); transition: all 0.15s;
  }
  .filter-btn:hover { border-color: var(--blue-light); }
  .filter-btn.active { background: var(--blue); color: white; border-color: var(--blue); }

  .month-group { padding: 0 1.5rem; }
  .month-header {
    font-size: 0.8rem; font-weight: 600; text-transform: uppercase; letter-spacing: 0.1em;
    color: var(--blue); padding: 1.2rem 0 0.5rem; border-bottom: 2px solid var(--blue);
    margin-bottom: 0.5rem; position: sticky; top: 0; background: var(--cream); z-index: 10;
  }

  .gap-item {
    display: flex; align-items: center; gap: 0.8rem; padding: 0.7rem 0.5rem;
    border-bottom: 1px solid var(--border); transition: all 0.2s;
    border-left: 3px solid transparent; border-radius: 4px; margin: 0.2rem 0;
  }
  .gap-item.blocked { background: #FFF5F5; border-left-color: #E53E3E; box-shadow: inset 0 0 12px rgba(229, 62, 62, 0.06); }
  .gap-item.bookable { border-left-color: var(--green); background: #F7FFF7; }
  .gap-item:has(.gap-check.done) { opacity: 0.4; }
  .gap-item:has(.gap-check.done) .gap-details { text-decoration: line-through; }

  .gap-check {
    width: 22px; height: 22px; border: 2px solid var(--border); border-radius: 4px;
    cursor: pointer; flex-shrink: 0; display: flex; align-items: center;
    justify-content: center; transition: all 0.15s; background: white;
  }
  .gap-check:hover { border-color: var(--green); }
  .gap-check.done { background: var(--green); border-color: var(--green); }
  .gap-check.done::after { content: '\2713'; color: white; font-size: 14px; font-weight: 600; }

  .gap-cabin-img { width: 48px; height: 48px; border-radius: 6px; object-fit: cover; flex-shrink: 0; }
  .gap-details { flex: 1; min-width: 0; }
  .gap-cabin-name { font-weight: 500; font-size: 0.9rem; }
  .gap-dates { font-size: 0.8rem; color: var(--text-light); }

  .gap-badge { padding: 0.2rem 0.6rem; border-radius: 1rem; font-size: 0.7rem; font-weight: 600; flex-shrink: 0; }
  .gap-badge.n1 { background: #FFF3E0; color: #E65100; }
  .gap-badge.n2 { background: #E8F5E9; color: #2E7D32; }
  .gap-badge.n3 { background: #E3F2FD; color: #1565C0; }

  .min-badge { padding: 0.35rem 0.7rem; border-radius: 1rem; font-size: 0.75rem; font-weight: 600; flex-shrink: 0; letter-spacing: 0.02em; }
  .min-badge.blocked { background: #FFCDD2; color: #B71C1C; border: 1px solid #EF9A9A; }
  .min-badge.ok { background: #C8E6C9; color: #1B5E20; border: 1px solid #A5D6A7; }

  .gap-rate { font-size: 0.8rem; color: var(--text-light); text-align: right; flex-shrink: 0; min-width: 60px; }
  .gap-rate strong { color: var(--text); }

  footer { text-align: center; padding: 2rem 1.5rem; font-size: 0.7rem; color: var(--text-light); }
  @media (max-width: 600px) { .gap-cabin-img { width: 40px; height: 40px; } .gap-rate { display: none; } }
"##;

const CLIENT_SCRIPT: &str = r##"const M = ['Jan','Feb','Mar','Apr','May','Jun','Jul','Aug','Sep','Oct','Nov','Dec'];
const D = ['Sun','Mon','Tue','Wed','Thu','Fri','Sat'];
const fmt = iso => { const d = new Date(iso+'T12:00:00'); return M[d.getMonth()]+' '+d.getDate(); };
const dow = iso => D[new Date(iso+'T12:00:00').getDay()];
const mk = iso => { const d = new Date(iso+'T12:00:00'); return M[d.getMonth()]+' '+d.getFullYear(); };
const gid = g => g.cabin+'|'+g.checkIn;
const esc = s => String(s).replace(/[&<>"']/g, c => ({'&':'&amp;','<':'&lt;','>':'&gt;','"':'&quot;',"'":'&#39;'}[c]));

let ck = JSON.parse(localStorage.getItem('cabin-gaps-ck') || '{}');
let filt = 'all';

function render() {
  const gaps = filt === 'all' ? DATA.gaps : DATA.gaps.filter(g => g.nights === +filt);
  let html = '', mo = null;
  for (const g of gaps) {
    const m = mk(g.checkIn);
    if (m !== mo) { if (mo) html += '</div>'; mo = m; html += '<div class="month-group"><div class="month-header">'+m+'</div>'; }
    const id = gid(g), done = ck[id] ? ' done' : '';
    html += '<div class="gap-item '+(g.bookable?'bookable':'blocked')+'"><div class="gap-check'+done+'" data-id="'+esc(id)+'"></div>'
      + '<img class="gap-cabin-img" src="'+esc(g.picture)+'" alt="" loading="lazy" onerror="this.style.display=\'none\'">'
      + '<div class="gap-details"><div class="gap-cabin-name">'+esc(g.cabin.replace(/ - .*/,''))+'</div>'
      + '<div class="gap-dates">'+dow(g.checkIn)+' '+fmt(g.checkIn)+' → '+fmt(g.checkOut)+'</div></div>'
      + '<span class="gap-badge n'+g.nights+'">'+g.nights+'N</span>'
      + '<span class="min-badge '+(g.bookable?'ok':'blocked')+'">'+(g.bookable?'✓':'\u{1F512}')+' minNights:'+g.minStay+'</span>'
      + '<div class="gap-rate"><strong>$'+g.totalRate+'</strong><br>'+(g.nights>1?'$'+g.nightlyRate+'/n':'')+'</div></div>';
  }
  if (mo) html += '</div>';
  document.getElementById('list').innerHTML = html;
  const total = DATA.gaps.length, done = DATA.gaps.filter(g => ck[gid(g)]).length;
  document.getElementById('total').textContent = total;
  document.getElementById('done').textContent = done;
  document.getElementById('remaining').textContent = total - done;
  document.getElementById('progress').style.width = (total ? done/total*100 : 0)+'%';
}

document.getElementById('list').addEventListener('click', e => {
  const el = e.target.closest('.gap-check');
  if (!el) return;
  const id = el.dataset.id;
  ck[id] ? delete ck[id] : ck[id] = 1;
  localStorage.setItem('cabin-gaps-ck', JSON.stringify(ck));
  el.classList.toggle('done');
  render();
});

document.querySelector('.filters').addEventListener('click', e => {
  const btn = e.target.closest('.filter-btn');
  if (!btn) return;
  document.querySelectorAll('.filter-btn').forEach(b => b.classList.remove('active'));
  btn.classList.add('active');
  filt = btn.dataset.filter;
  render();
});

document.getElementById('generated').textContent = new Date(DATA.generated).toLocaleDateString();
render();
"##;
