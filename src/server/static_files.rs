//! The single-page portal.

use axum::{extract::State, response::Html};
use std::sync::Arc;

use super::state::AppState;

const INDEX_HTML: &str = r#"<!doctype html>
<html lang="en">
<head>
<meta charset="utf-8">
<title>Scanbook</title>
<style>
  body { font-family: system-ui, sans-serif; margin: 2rem; max-width: 60rem; }
  header { display: flex; justify-content: space-between; align-items: center; }
  .item { display: inline-block; margin: 0 1rem 1.5rem 0; vertical-align: top; }
  .item img { display: block; image-rendering: pixelated; border: 1px solid #ddd; }
  .hidden { display: none; }
  .error { color: #b00; }
  pre { background: #f4f4f4; padding: .5rem; }
</style>
</head>
<body>
<header>
  <h1>Scanbook</h1>
  <span id="who"></span>
</header>

<section id="login">
  <input id="username" placeholder="username">
  <input id="password" type="password" placeholder="password">
  <button onclick="login()">Sign in</button>
  <span id="login-error" class="error"></span>
</section>

<section id="app" class="hidden">
  <p>Symbols: <span id="status">...</span></p>
  <select id="scanbooks" onchange="showScanbook(this.value)"></select>
  <a id="sheet" target="_blank">Print sheet</a>
  <div id="steps"></div>
  <div id="items"></div>

  <h2>Custom item</h2>
  <input id="new-name" placeholder="name">
  <input id="new-sku" placeholder="SKU">
  <select id="new-symbology">
    <option value="linear">linear</option>
    <option value="code128">code128</option>
    <option value="qr">qr</option>
    <option value="gs1_datamatrix">gs1_datamatrix</option>
  </select>
  <button onclick="addItem()">Add</button>
  <span id="item-error" class="error"></span>

  <h2>GS1 preview</h2>
  <input id="gs1-gtin" placeholder="GTIN">
  <input id="gs1-date" placeholder="sell by YYYY-MM-DD">
  <input id="gs1-batch" placeholder="batch">
  <button onclick="previewGs1()">Preview</button>
  <pre id="gs1-out"></pre>
</section>

<script>
window.__BOOT = __BOOT_TIME__;
let user = null;

async function api(path, opts = {}) {
  opts.headers = Object.assign({ 'content-type': 'application/json' }, opts.headers || {});
  if (user) opts.headers['x-scanbook-user'] = user;
  const res = await fetch(path, opts);
  const body = res.status === 204 ? null : await res.json();
  if (!res.ok) throw new Error(body && body.error || res.statusText);
  return body;
}

async function init() {
  const info = await api('/api/login');
  if (info.last_username) document.getElementById('username').value = info.last_username;
}

async function login() {
  try {
    const session = await api('/api/login', { method: 'POST', body: JSON.stringify({
      username: document.getElementById('username').value,
      password: document.getElementById('password').value,
    })});
    user = session.username;
    document.getElementById('who').textContent = user;
    document.getElementById('login').classList.add('hidden');
    document.getElementById('app').classList.remove('hidden');
    loadApp();
  } catch (e) {
    document.getElementById('login-error').textContent = e.message;
  }
}

async function loadApp() {
  const status = await api('/api/symbols/status');
  document.getElementById('status').textContent = status.state;
  if (status.state !== 'ready' && status.state !== 'failed') setTimeout(loadApp, 1000);
  const books = await api('/api/scanbooks');
  const select = document.getElementById('scanbooks');
  if (!select.options.length) {
    for (const b of books) select.add(new Option(b.title, b.id));
    showScanbook(books[0].id);
  }
}

function el(tag, text) {
  const node = document.createElement(tag);
  if (text !== undefined) node.textContent = text;
  return node;
}

async function showScanbook(id) {
  const book = await api('/api/scanbooks/' + id);
  document.getElementById('sheet').href = '/api/scanbooks/' + id + '/sheet.png';
  const steps = document.getElementById('steps');
  const list = el('ol');
  for (const s of book.steps) list.append(el('li', s));
  steps.replaceChildren(el('p', book.description), list);
  const items = document.getElementById('items');
  items.replaceChildren(...book.items.map(i => {
    const card = el('div');
    card.className = 'item';
    const img = el('img');
    img.src = '/api/items/' + encodeURIComponent(i.sku) + '/barcode.png?v=' + window.__BOOT;
    card.append(el('strong', i.name), el('br'), el('small', i.display), img);
    return card;
  }));
}

async function addItem() {
  try {
    await api('/api/items', { method: 'POST', body: JSON.stringify({
      name: document.getElementById('new-name').value,
      sku: document.getElementById('new-sku').value,
      symbology: document.getElementById('new-symbology').value,
    })});
    document.getElementById('item-error').textContent = 'added';
  } catch (e) {
    document.getElementById('item-error').textContent = e.message;
  }
}

async function previewGs1() {
  const out = await api('/api/gs1/preview', { method: 'POST', body: JSON.stringify({
    gtin: document.getElementById('gs1-gtin').value || null,
    sell_by_date: document.getElementById('gs1-date').value || null,
    batch: document.getElementById('gs1-batch').value || null,
  })});
  document.getElementById('gs1-out').textContent =
    out.display + (out.strict_error ? '\n\nstrict: ' + out.strict_error : '');
}

init();
</script>
</body>
</html>
"#;

/// Serve the portal with the boot time injected for cache busting.
pub async fn index_handler(State(state): State<Arc<AppState>>) -> Html<String> {
    Html(INDEX_HTML.replace("__BOOT_TIME__", &state.boot_time.to_string()))
}
