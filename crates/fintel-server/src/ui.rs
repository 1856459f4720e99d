//! Embedded dashboard page.
//!
//! Deliberately thin glue: the page only renders what the JSON API
//! returns (metrics, chart series, table, warnings) and has no logic of
//! its own beyond rendering.

pub const DASHBOARD_HTML: &str = r##"<!DOCTYPE html>
<html lang="en">
<head>
<meta charset="utf-8">
<title>Fintel | Financial Document Analytics</title>
<style>
  body { font-family: system-ui, sans-serif; margin: 0; background: #f6f7fb; color: #1c2333; }
  header { background: #fff; border-bottom: 1px solid #e3e6ef; padding: 16px 24px; }
  header h1 { margin: 0; font-size: 20px; }
  header p { margin: 4px 0 0; color: #6b7280; font-size: 13px; }
  main { max-width: 1100px; margin: 0 auto; padding: 24px; }
  .controls { background: #fff; border: 1px solid #e3e6ef; border-radius: 10px; padding: 16px; display: flex; gap: 12px; flex-wrap: wrap; align-items: center; }
  .controls select, .controls input, .controls button { font-size: 14px; padding: 8px; }
  .controls button { background: #2563eb; color: #fff; border: 0; border-radius: 6px; padding: 8px 18px; cursor: pointer; }
  .controls button:disabled { background: #9ca3af; }
  #status { color: #6b7280; font-size: 13px; }
  #warnings { margin-top: 12px; }
  #warnings div { background: #fef3c7; border: 1px solid #fcd34d; border-radius: 6px; padding: 8px 12px; margin-top: 6px; font-size: 13px; }
  #error { background: #fee2e2; border: 1px solid #fca5a5; border-radius: 6px; padding: 8px 12px; margin-top: 12px; font-size: 13px; display: none; }
  .metrics { display: flex; gap: 12px; margin-top: 20px; flex-wrap: wrap; }
  .metric { background: #fff; border: 1px solid #e3e6ef; border-radius: 10px; padding: 14px 18px; min-width: 180px; }
  .metric .label { font-size: 12px; color: #6b7280; }
  .metric .value { font-size: 22px; font-weight: 600; margin-top: 4px; }
  .charts { display: grid; grid-template-columns: 1fr 1fr; gap: 16px; margin-top: 20px; }
  .panel { background: #fff; border: 1px solid #e3e6ef; border-radius: 10px; padding: 16px; }
  .panel h2 { margin: 0 0 12px; font-size: 15px; }
  .bar-row { display: flex; align-items: center; gap: 8px; margin: 6px 0; font-size: 13px; }
  .bar-row .name { width: 140px; color: #374151; }
  .bar-row .bar { height: 16px; border-radius: 3px; min-width: 2px; }
  table { width: 100%; border-collapse: collapse; font-size: 13px; margin-top: 8px; }
  th, td { text-align: left; border-bottom: 1px solid #e3e6ef; padding: 6px 10px; }
  th { color: #6b7280; font-weight: 600; }
  #download { display: inline-block; margin-top: 16px; font-size: 14px; }
</style>
</head>
<body>
<header>
  <h1>&#128196; Fintel</h1>
  <p>Financial document intelligence dashboard</p>
</header>
<main>
  <div class="controls">
    <label>Document type
      <select id="doc-type"></select>
    </label>
    <input id="files" type="file" accept=".png,.jpg,.jpeg" multiple>
    <button id="analyze">Analyze Documents</button>
    <span id="status"></span>
  </div>
  <div id="error"></div>
  <div id="warnings"></div>
  <div id="results" style="display:none">
    <div class="metrics" id="metrics"></div>
    <div class="charts">
      <div class="panel"><h2 id="prop-title">Distribution</h2><div id="proportions"></div></div>
      <div class="panel"><h2 id="mag-title">Breakdown</h2><div id="totals"></div></div>
    </div>
    <div class="panel" style="margin-top:16px">
      <h2>Raw data</h2>
      <div style="overflow-x:auto"><table id="table"></table></div>
      <a id="download" href="/api/report.csv">Download report as CSV</a>
    </div>
  </div>
</main>
<script>
const PALETTES = {
  Blues: "#2563eb", Greens: "#059669", Purples: "#7c3aed",
  Oranges: "#ea580c", Reds: "#dc2626"
};

async function loadSchemas() {
  const res = await fetch("/api/schemas");
  const schemas = await res.json();
  const select = document.getElementById("doc-type");
  for (const s of schemas) {
    const opt = document.createElement("option");
    opt.value = s.name;
    opt.textContent = s.name;
    select.appendChild(opt);
  }
}

function fmt(n) {
  return n.toLocaleString("en-US", { maximumFractionDigits: 2 });
}

function renderBars(el, rows, color, valueOf, labelOf) {
  el.innerHTML = "";
  const max = Math.max(...rows.map(valueOf), 1e-9);
  for (const row of rows) {
    const div = document.createElement("div");
    div.className = "bar-row";
    const name = document.createElement("span");
    name.className = "name";
    name.textContent = row.field;
    const bar = document.createElement("span");
    bar.className = "bar";
    bar.style.background = color;
    bar.style.width = (valueOf(row) / max * 60) + "%";
    const label = document.createElement("span");
    label.textContent = labelOf(row);
    div.append(name, bar, label);
    el.appendChild(div);
  }
}

function render(payload) {
  const color = PALETTES[payload.color_scale] || PALETTES.Blues;
  document.getElementById("results").style.display = "block";
  document.getElementById("prop-title").textContent = payload.doc_type + " distribution";
  document.getElementById("mag-title").textContent = payload.doc_type + " breakdown";

  const metrics = document.getElementById("metrics");
  metrics.innerHTML = "";
  for (const m of payload.metrics) {
    const card = document.createElement("div");
    card.className = "metric";
    card.innerHTML = '<div class="label"></div><div class="value"></div>';
    card.querySelector(".label").textContent = m.label;
    card.querySelector(".value").textContent = fmt(m.value);
    metrics.appendChild(card);
  }

  const props = document.getElementById("proportions");
  if (payload.proportions.length) {
    renderBars(props, payload.proportions, color,
      r => r.share, r => (r.share * 100).toFixed(1) + "%");
  } else {
    props.textContent = "No non-zero values to display.";
  }
  renderBars(document.getElementById("totals"), payload.totals, color,
    r => Math.max(r.total, 0), r => fmt(r.total));

  const table = document.getElementById("table");
  table.innerHTML = "";
  const head = table.insertRow();
  for (const col of payload.table.columns) {
    const th = document.createElement("th");
    th.textContent = col;
    head.appendChild(th);
  }
  for (const row of payload.table.rows) {
    const tr = table.insertRow();
    tr.insertCell().textContent = row.document;
    for (const v of row.values) tr.insertCell().textContent = fmt(v);
  }

  renderWarnings(payload.warnings);
}

function renderWarnings(list) {
  const warnings = document.getElementById("warnings");
  warnings.innerHTML = "";
  for (const w of list) {
    const div = document.createElement("div");
    div.textContent = "⚠ " + w;
    warnings.appendChild(div);
  }
}

let polling = null;
function startPolling() {
  polling = setInterval(async () => {
    const res = await fetch("/api/progress");
    const p = await res.json();
    if (p.total > 0) {
      document.getElementById("status").textContent =
        "Processing " + p.done + " / " + p.total + "...";
    }
  }, 500);
}
function stopPolling() {
  clearInterval(polling);
  document.getElementById("status").textContent = "";
}

async function analyze() {
  const files = document.getElementById("files").files;
  const errorBox = document.getElementById("error");
  errorBox.style.display = "none";
  if (!files.length) {
    errorBox.textContent = "Select one or more PNG/JPEG images first.";
    errorBox.style.display = "block";
    return;
  }
  const form = new FormData();
  form.append("doc_type", document.getElementById("doc-type").value);
  for (const f of files) form.append("file", f, f.name);

  const button = document.getElementById("analyze");
  button.disabled = true;
  startPolling();
  try {
    const res = await fetch("/api/analyze", { method: "POST", body: form });
    const body = await res.json();
    if (!res.ok) {
      errorBox.textContent = body.error || "Analysis failed.";
      errorBox.style.display = "block";
      renderWarnings(body.warnings || []);
      return;
    }
    render(body);
  } finally {
    button.disabled = false;
    stopPolling();
  }
}

document.getElementById("analyze").addEventListener("click", analyze);
loadSchemas();
fetch("/api/table").then(r => r.ok ? r.json().then(render) : null);
</script>
</body>
</html>
"##;
