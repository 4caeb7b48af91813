pub fn render_index(date: &str) -> String {
    INDEX_HTML.replace("{{DATE}}", date)
}

const INDEX_HTML: &str = r##"<!DOCTYPE html>
<html lang="en">
<head>
  <meta charset="UTF-8" />
  <meta name="viewport" content="width=device-width, initial-scale=1.0" />
  <title>Attendance Tracker</title>
  <style>
    :root {
      --bg: #f5f6f8;
      --ink: #1f2933;
      --muted: #6b7280;
      --card: #ffffff;
      --good: #16a34a;
      --warning: #ca8a04;
      --critical: #dc2626;
      --accent: #2563eb;
    }

    * {
      box-sizing: border-box;
    }

    body {
      margin: 0;
      background: var(--bg);
      color: var(--ink);
      font-family: "Inter", "Segoe UI", sans-serif;
    }

    header {
      background: var(--card);
      border-bottom: 1px solid #e5e7eb;
      padding: 16px 24px;
      display: flex;
      justify-content: space-between;
      align-items: center;
    }

    h1 {
      margin: 0;
      font-size: 1.3rem;
    }

    main {
      max-width: 960px;
      margin: 0 auto;
      padding: 24px;
      display: grid;
      gap: 24px;
    }

    section {
      background: var(--card);
      border: 1px solid #e5e7eb;
      border-radius: 12px;
      padding: 20px;
    }

    h2 {
      margin: 0 0 16px;
      font-size: 1.1rem;
    }

    .overview {
      display: grid;
      grid-template-columns: repeat(auto-fit, minmax(140px, 1fr));
      gap: 12px;
    }

    .overview div {
      text-align: center;
      background: var(--bg);
      border-radius: 10px;
      padding: 12px;
    }

    .overview strong {
      display: block;
      font-size: 1.5rem;
    }

    .row {
      display: flex;
      align-items: center;
      justify-content: space-between;
      gap: 12px;
      padding: 10px 0;
      border-bottom: 1px solid #f0f0f0;
    }

    .dot {
      width: 12px;
      height: 12px;
      border-radius: 50%;
      display: inline-block;
      margin-right: 8px;
    }

    .good { color: var(--good); }
    .warning { color: var(--warning); }
    .critical { color: var(--critical); }

    form {
      display: flex;
      flex-wrap: wrap;
      gap: 8px;
      margin-bottom: 12px;
    }

    input, select, button {
      font: inherit;
      padding: 6px 10px;
      border-radius: 6px;
      border: 1px solid #d1d5db;
    }

    button {
      background: var(--accent);
      color: white;
      border: none;
      cursor: pointer;
    }

    button.secondary {
      background: #e5e7eb;
      color: var(--ink);
    }

    .status {
      min-height: 1.2em;
      color: var(--muted);
    }

    .status[data-type="error"] {
      color: var(--critical);
    }
  </style>
</head>
<body>
  <header>
    <h1>Attendance Tracker</h1>
    <span id="counts" class="status"></span>
  </header>

  <main>
    <section>
      <h2>Overview</h2>
      <div class="overview">
        <div><strong id="total-subjects">0</strong>Subjects</div>
        <div><strong id="total-lectures">0</strong>Lectures</div>
        <div><strong id="total-present">0</strong>Present</div>
        <div><strong id="overall">0%</strong>Overall</div>
      </div>
      <p id="attention" class="warning"></p>
      <div id="stats"></div>
    </section>

    <section>
      <h2>Subjects</h2>
      <form id="subject-form">
        <input id="subject-name" placeholder="Subject name" required />
        <input id="subject-color" type="color" value="#3B82F6" />
        <input id="subject-min" type="number" min="0" max="100" placeholder="Min %" />
        <button type="submit">Add subject</button>
      </form>
      <div id="subjects"></div>
    </section>

    <section>
      <h2>Mark attendance</h2>
      <form onsubmit="return false">
        <input id="mark-date" type="date" value="{{DATE}}" />
      </form>
      <div id="sheet"></div>
    </section>

    <section>
      <h2>Settings</h2>
      <form id="settings-form">
        <label>Default minimum %
          <input id="default-min" type="number" min="0" max="100" />
        </label>
        <select id="export-format">
          <option value="json">JSON</option>
          <option value="csv">CSV (coming soon)</option>
        </select>
        <button type="submit">Save</button>
      </form>
      <form onsubmit="return false">
        <button type="button" id="export-btn">Export backup</button>
        <input id="import-file" type="file" accept=".json,application/json" />
      </form>
    </section>

    <div class="status" id="status"></div>
  </main>

  <script>
    const $ = (id) => document.getElementById(id);
    let state = null;

    const setStatus = (message, type) => {
      $('status').textContent = message;
      $('status').dataset.type = type || '';
    };

    const api = async (method, url, body, raw) => {
      const options = { method, headers: {} };
      if (body !== undefined) {
        options.headers['content-type'] = raw ? 'text/plain' : 'application/json';
        options.body = raw ? body : JSON.stringify(body);
      }
      const res = await fetch(url, options);
      if (!res.ok) {
        throw new Error((await res.text()) || 'Request failed');
      }
      return res.status === 204 ? null : res.json();
    };

    const escape = (text) => String(text).replace(/[&<>"']/g, (c) => ({
      '&': '&amp;', '<': '&lt;', '>': '&gt;', '"': '&quot;', "'": '&#39;'
    })[c]);

    const renderStats = () => {
      const o = state.overview;
      $('total-subjects').textContent = o.totalSubjects;
      $('total-lectures').textContent = o.totalLectures;
      $('total-present').textContent = o.totalPresent;
      $('overall').textContent = Math.round(o.overallPercentage) + '%';
      $('counts').textContent = `${state.subjects.length} subjects • ${state.attendance.length} records`;

      const notes = [];
      if (o.criticalSubjects > 0) notes.push(`${o.criticalSubjects} subject(s) have critical attendance.`);
      if (o.warningSubjects > 0) notes.push(`${o.warningSubjects} subject(s) need attention.`);
      $('attention').textContent = notes.join(' ');

      $('stats').innerHTML = state.stats.map((s) => `
        <div class="row">
          <span><span class="dot" style="background:${escape(s.subjectColor)}"></span>${escape(s.subjectName)}</span>
          <span>${s.presentCount}/${s.totalLectures} lectures</span>
          <span class="${escape(s.status)}">${s.percentage}% (target ${s.minAttendance}%)
            ${s.status === 'critical' ? `· ${s.deficit.toFixed(1)}% below target` : ''}</span>
        </div>`).join('') || '<p class="status">No attendance data available.</p>';
    };

    const renderSubjects = () => {
      $('subjects').innerHTML = state.subjects.map((s) => `
        <div class="row">
          <span><span class="dot" style="background:${escape(s.color)}"></span>${escape(s.name)}</span>
          <span>min ${s.minAttendance}%</span>
          <span>
            <button class="secondary" data-rename="${escape(s.id)}">Rename</button>
            <button class="secondary" data-delete="${escape(s.id)}">Delete</button>
          </span>
        </div>`).join('');
    };

    const renderSheet = async () => {
      const date = $('mark-date').value;
      const sheet = await api('GET', `/api/attendance?date=${encodeURIComponent(date)}`);
      $('sheet').innerHTML = sheet.entries.map((e) => `
        <div class="row">
          <span><span class="dot" style="background:${escape(e.subjectColor)}"></span>${escape(e.subjectName)} · Lecture #${e.lectureNumber}</span>
          <span>
            ${e.status
              ? `<strong>${e.status}</strong> <button class="secondary" data-unmark="${escape(e.subjectId)}">Remove</button>`
              : `<button data-mark="present" data-subject="${escape(e.subjectId)}">Present</button>
                 <button class="secondary" data-mark="absent" data-subject="${escape(e.subjectId)}">Absent</button>`}
          </span>
        </div>`).join('') || '<p class="status">No subjects available. Please add subjects first.</p>';
    };

    const refresh = async () => {
      state = await api('GET', '/api/state');
      $('default-min').value = state.settings.defaultMinAttendance;
      $('export-format').value = state.settings.exportFormat;
      renderStats();
      renderSubjects();
      await renderSheet();
    };

    const run = (action) => action().then(refresh).catch((err) => setStatus(err.message, 'error'));

    $('subject-form').addEventListener('submit', (event) => {
      event.preventDefault();
      const min = $('subject-min').value;
      run(() => api('POST', '/api/subjects', {
        name: $('subject-name').value,
        color: $('subject-color').value,
        minAttendance: min === '' ? null : Number(min)
      }).then(() => { $('subject-name').value = ''; }));
    });

    $('subjects').addEventListener('click', (event) => {
      const { rename, delete: remove } = event.target.dataset;
      if (remove && confirm('Delete this subject? All attendance records will be lost.')) {
        run(() => api('DELETE', `/api/subjects/${encodeURIComponent(remove)}`));
      }
      if (rename) {
        const subject = state.subjects.find((s) => s.id === rename);
        const name = prompt('New name', subject.name);
        if (name) {
          run(() => api('PUT', `/api/subjects/${encodeURIComponent(rename)}`, {
            name, color: subject.color, minAttendance: subject.minAttendance
          }));
        }
      }
    });

    $('sheet').addEventListener('click', (event) => {
      const { mark, subject, unmark } = event.target.dataset;
      const date = $('mark-date').value;
      if (mark) {
        run(() => api('PUT', '/api/attendance', { subjectId: subject, date, status: mark }));
      }
      if (unmark) {
        run(() => api('DELETE', `/api/attendance?subjectId=${encodeURIComponent(unmark)}&date=${encodeURIComponent(date)}`));
      }
    });

    $('mark-date').addEventListener('change', () => renderSheet().catch((err) => setStatus(err.message, 'error')));

    $('settings-form').addEventListener('submit', (event) => {
      event.preventDefault();
      run(() => api('PUT', '/api/settings', {
        defaultMinAttendance: parseInt($('default-min').value, 10) || 75,
        exportFormat: $('export-format').value
      }).then(() => setStatus('Settings saved', 'ok')));
    });

    $('export-btn').addEventListener('click', () => {
      window.location.href = '/api/export';
    });

    $('import-file').addEventListener('change', async (event) => {
      const file = event.target.files[0];
      if (!file) return;
      if (!confirm('Importing replaces all current data. Continue?')) {
        event.target.value = '';
        return;
      }
      const text = await file.text();
      run(() => api('POST', '/api/import', text, true).then(() => setStatus('Data imported successfully!', 'ok')))
        .finally(() => { event.target.value = ''; });
    });

    refresh().catch((err) => setStatus(err.message, 'error'));
  </script>
</body>
</html>
"##;
