use axum::response::Html;

pub(crate) async fn index() -> Html<&'static str> {
    Html(INDEX_PAGE_HTML)
}

/// The staff page. All server data is inserted with `textContent`, never as markup.
const INDEX_PAGE_HTML: &str = r##"<!DOCTYPE html>
<html lang="en">
<head>
  <meta charset="utf-8">
  <meta name="viewport" content="width=device-width, initial-scale=1">
  <title>Clinical Records Management System</title>
  <style>
    * { box-sizing: border-box; }
    body {
      font-family: -apple-system, BlinkMacSystemFont, 'Segoe UI', system-ui, sans-serif;
      margin: 0; color: #1c1917; background: #fafaf9;
      display: flex; min-height: 100vh;
    }
    aside { width: 300px; padding: 20px; background: #f0f2f6; border-right: 1px solid #e7e5e4; }
    main { flex: 1; padding: 24px 32px; max-width: 1000px; }
    h1 { font-size: 26px; margin: 0 0 16px; }
    h2 { font-size: 18px; margin: 0 0 12px; }
    label { display: block; font-size: 13px; margin: 10px 0 4px; color: #44403c; }
    input, select, textarea {
      width: 100%; padding: 8px; font: inherit; font-size: 14px;
      border: 1px solid #d6d3d1; border-radius: 6px; background: #fff;
    }
    textarea { min-height: 90px; resize: vertical; }
    button {
      margin-top: 12px; padding: 8px 14px; font: inherit; font-size: 14px;
      border: 1px solid #d6d3d1; border-radius: 6px; background: #fff; cursor: pointer;
    }
    button.primary { background: #ff4b4b; border-color: #ff4b4b; color: #fff; }
    button:disabled { opacity: 0.6; cursor: wait; }
    .tabs { display: flex; gap: 4px; border-bottom: 1px solid #e7e5e4; margin-bottom: 16px; }
    .tab { border: none; border-bottom: 2px solid transparent; border-radius: 0; margin: 0; background: none; }
    .tab.active { border-bottom-color: #ff4b4b; color: #ff4b4b; }
    .panel { display: none; }
    .panel.active { display: block; }
    details { border: 1px solid #e7e5e4; border-radius: 6px; margin-bottom: 10px; background: #fff; }
    summary { padding: 10px; cursor: pointer; font-weight: 600; }
    .body { padding: 0 12px 12px; white-space: pre-wrap; font-size: 14px; }
    .muted { color: #78716c; font-size: 13px; }
    .notice { padding: 10px; border-radius: 6px; margin: 10px 0; font-size: 14px; }
    .notice.ok { background: #dcfce7; color: #166534; }
    .notice.err { background: #fee2e2; color: #991b1b; }
    .notice.info { background: #e0f2fe; color: #075985; }
    .msg { padding: 10px 12px; border-radius: 8px; margin-bottom: 8px; white-space: pre-wrap; font-size: 14px; }
    .msg.user { background: #f5f5f4; }
    .msg.assistant { background: #fff; border: 1px solid #e7e5e4; }
    .msg .role { font-size: 12px; font-weight: 600; color: #78716c; margin-bottom: 4px; }
    .hidden { display: none; }
  </style>
</head>
<body>
  <aside>
    <h2>Add New Patient Record</h2>
    <form id="patient-form">
      <label for="name">Patient Name</label>
      <input id="name" name="name" autocomplete="off">
      <label for="id">Patient ID</label>
      <input id="id" name="id" autocomplete="off">
      <label for="age">Age</label>
      <input id="age" name="age" type="number" min="0" value="0">
      <label for="gender">Gender</label>
      <select id="gender" name="gender">
        <option>Select</option>
        <option>Male</option>
        <option>Female</option>
        <option>Other</option>
      </select>
      <label for="history">Upload Patient History (PDF)</label>
      <input id="history" name="history" type="file" accept="application/pdf,.pdf">
      <button class="primary" type="submit" id="add-button">Add Patient Record</button>
    </form>
    <div id="form-notice" class="notice hidden"></div>
  </aside>
  <main>
    <h1>Clinical Records Management System</h1>
    <div class="tabs">
      <button class="tab active" data-panel="records">Patient Records</button>
      <button class="tab" data-panel="summaries">Medical Summaries</button>
      <button class="tab" data-panel="assistant">Medical Assistant</button>
    </div>

    <section id="records" class="panel active">
      <h2>Patient Records</h2>
      <div id="records-list"></div>
    </section>

    <section id="summaries" class="panel">
      <h2>Medical Summaries</h2>
      <div id="summaries-list"></div>
    </section>

    <section id="assistant" class="panel">
      <h2>Medical Assistant</h2>
      <div id="assistant-empty" class="notice info">Add patient records to start using the medical assistant.</div>
      <div id="assistant-ui" class="hidden">
        <label for="context">Select patient context</label>
        <select id="context"></select>
        <div id="chat-log" style="margin-top: 16px;"></div>
        <label for="question">Ask about the patient(s)</label>
        <textarea id="question"></textarea>
        <button class="primary" id="send-button">Send</button>
        <button id="clear-button">Clear Chat History</button>
        <div id="chat-notice" class="notice hidden"></div>
      </div>
    </section>
  </main>

  <script>
    const ALL_PATIENTS = 'All Patients';
    const NO_RECORDS = 'No patient records available. Add patients using the sidebar form.';

    function el(tag, className, text) {
      const node = document.createElement(tag);
      if (className) node.className = className;
      if (text !== undefined) node.textContent = text;
      return node;
    }

    function notice(target, kind, text) {
      target.className = 'notice ' + kind;
      target.textContent = text;
    }

    async function api(method, path, body) {
      const opts = { method };
      if (body instanceof FormData) {
        opts.body = body;
      } else if (body !== undefined) {
        opts.headers = { 'Content-Type': 'application/json' };
        opts.body = JSON.stringify(body);
      }
      const res = await fetch(path, opts);
      if (res.status === 204) return null;
      const data = await res.json().catch(() => ({ error: 'Unexpected response (' + res.status + ')' }));
      if (!res.ok) throw new Error(data.error || ('Request failed (' + res.status + ')'));
      return data;
    }

    document.querySelectorAll('.tab').forEach(tab => {
      tab.addEventListener('click', () => {
        document.querySelectorAll('.tab').forEach(t => t.classList.remove('active'));
        document.querySelectorAll('.panel').forEach(p => p.classList.remove('active'));
        tab.classList.add('active');
        document.getElementById(tab.dataset.panel).classList.add('active');
      });
    });

    function renderRecords(patients) {
      const list = document.getElementById('records-list');
      list.replaceChildren();
      if (patients.length === 0) {
        list.appendChild(el('p', 'muted', NO_RECORDS));
        return;
      }
      for (const p of patients) {
        const item = el('details');
        item.appendChild(el('summary', null, 'Patient: ' + p.name + ' (ID: ' + p.id + ')'));
        const body = el('div', 'body');
        body.appendChild(el('div', null, 'Age: ' + p.age));
        body.appendChild(el('div', null, 'Gender: ' + p.gender));
        body.appendChild(el('div', null, 'Last Updated: ' + p.last_updated));
        const full = el('details');
        full.appendChild(el('summary', null, 'View Full Medical Record'));
        const record = el('textarea');
        record.readOnly = true;
        record.rows = 12;
        const status = el('div', 'notice hidden');
        full.append(record, status);
        full.addEventListener('toggle', async () => {
          if (!full.open || full.dataset.loaded) return;
          try {
            const res = await api('GET', '/patients/' + encodeURIComponent(p.id));
            record.value = res.text;
            full.dataset.loaded = 'true';
          } catch (e) {
            notice(status, 'err', e.message);
          }
        });
        body.appendChild(full);
        item.appendChild(body);
        list.appendChild(item);
      }
    }

    function renderSummaries(patients) {
      const list = document.getElementById('summaries-list');
      list.replaceChildren();
      if (patients.length === 0) {
        list.appendChild(el('p', 'muted', NO_RECORDS));
        return;
      }
      for (const p of patients) {
        const item = el('details');
        item.appendChild(el('summary', null, 'Summary for ' + p.name + ' (ID: ' + p.id + ')'));
        const body = el('div', 'body');
        body.appendChild(el('div', null, p.summary));
        const label = el('label', null, 'Current Prescription');
        const editor = el('textarea');
        editor.value = p.prescription || '';
        const save = el('button', null, 'Save Prescription');
        const status = el('div', 'notice hidden');
        save.addEventListener('click', async () => {
          save.disabled = true;
          try {
            const res = await api('PUT', '/patients/' + encodeURIComponent(p.id) + '/prescription',
              { prescription: editor.value });
            notice(status, 'ok', res.message);
          } catch (e) {
            notice(status, 'err', e.message);
          } finally {
            save.disabled = false;
          }
        });
        body.append(label, editor, save, status);
        item.appendChild(body);
        list.appendChild(item);
      }
    }

    function renderContext(patients) {
      const select = document.getElementById('context');
      const previous = select.value;
      select.replaceChildren();
      const all = el('option', null, ALL_PATIENTS);
      all.value = ALL_PATIENTS;
      select.appendChild(all);
      for (const p of patients) {
        const option = el('option', null, p.name + ' (ID: ' + p.id + ')');
        option.value = p.id;
        select.appendChild(option);
      }
      if ([...select.options].some(o => o.value === previous)) select.value = previous;
      const empty = patients.length === 0;
      document.getElementById('assistant-empty').classList.toggle('hidden', !empty);
      document.getElementById('assistant-ui').classList.toggle('hidden', empty);
    }

    function renderHistory(history) {
      const log = document.getElementById('chat-log');
      log.replaceChildren();
      for (const m of history) {
        const item = el('div', 'msg ' + m.role);
        item.appendChild(el('div', 'role', m.role === 'user' ? 'You' : 'Assistant'));
        item.appendChild(el('div', null, m.content));
        log.appendChild(item);
      }
    }

    async function refresh() {
      const data = await api('GET', '/patients');
      renderRecords(data.patients);
      renderSummaries(data.patients);
      renderContext(data.patients);
      const chat = await api('GET', '/chat');
      renderHistory(chat.history);
    }

    document.getElementById('patient-form').addEventListener('submit', async event => {
      event.preventDefault();
      const form = event.target;
      const target = document.getElementById('form-notice');
      const button = document.getElementById('add-button');
      button.disabled = true;
      notice(target, 'info', 'Processing medical record...');
      try {
        const res = await api('POST', '/patients', new FormData(form));
        notice(target, 'ok', res.message);
        form.reset();
        await refresh();
      } catch (e) {
        notice(target, 'err', e.message);
      } finally {
        button.disabled = false;
      }
    });

    document.getElementById('send-button').addEventListener('click', async () => {
      const question = document.getElementById('question');
      const target = document.getElementById('chat-notice');
      const button = document.getElementById('send-button');
      if (!question.value.trim()) return;
      button.disabled = true;
      notice(target, 'info', 'Analyzing records...');
      try {
        const res = await api('POST', '/chat', {
          question: question.value,
          patient: document.getElementById('context').value
        });
        renderHistory(res.history);
        question.value = '';
        target.className = 'notice hidden';
      } catch (e) {
        notice(target, 'err', e.message);
      } finally {
        button.disabled = false;
      }
    });

    document.getElementById('clear-button').addEventListener('click', async () => {
      const target = document.getElementById('chat-notice');
      try {
        await api('DELETE', '/chat');
        renderHistory([]);
        target.className = 'notice hidden';
      } catch (e) {
        notice(target, 'err', e.message);
      }
    });

    refresh().catch(e => notice(document.getElementById('form-notice'), 'err', e.message));
  </script>
</body>
</html>
"##;
