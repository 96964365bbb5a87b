// Operator Dashboard
//
// Self-contained HTML page: renders the status snapshot, subscribes to
// the SSE push channel, and exposes the rate control.

pub const DASHBOARD_HTML: &str = r#"<!DOCTYPE html>
<html>
<head>
    <title>Gridsim Cluster</title>
    <meta charset="utf-8">
    <style>
        body { font-family: system-ui, sans-serif; margin: 2rem; background: #1a1a2e; color: #eee; }
        h1 { color: #7c3aed; }
        .tiles { display: flex; gap: 1rem; flex-wrap: wrap; margin: 1rem 0; }
        .tile { background: #16213e; padding: 1rem 1.5rem; border-radius: 8px; min-width: 9rem; }
        .tile .value { font-size: 1.6rem; font-weight: 600; }
        .tile .label { font-size: 0.8rem; color: #888; }
        .columns { display: flex; gap: 2rem; flex-wrap: wrap; }
        .panel { background: #16213e; padding: 1rem; border-radius: 8px; flex: 1; min-width: 20rem; }
        table { width: 100%; border-collapse: collapse; font-size: 0.85rem; }
        th, td { text-align: left; padding: 0.3rem 0.5rem; border-bottom: 1px solid #0f0f23; }
        .status-online { color: #4ade80; }
        .status-busy { color: #facc15; }
        .status-failed { color: #f87171; }
        .controls { margin: 1rem 0; }
        input[type=number] { width: 5rem; background: #0f0f23; color: #eee; border: 1px solid #333; padding: 0.3rem; border-radius: 4px; }
        button { background: #7c3aed; color: white; border: none; padding: 0.4rem 1rem; border-radius: 4px; cursor: pointer; }
        button:hover { background: #6d28d9; }
        .muted { color: #888; font-size: 0.8rem; }
    </style>
</head>
<body>
    <h1>Gridsim Cluster Controller</h1>
    <div class="controls">
        Job rate (jobs/min):
        <input type="number" id="rate" min="0.1" max="50" step="0.1" value="2.0">
        <button onclick="applyRate()">Apply</button>
        <span class="muted" id="rate-msg"></span>
    </div>
    <div class="tiles" id="tiles"></div>
    <div class="columns">
        <div class="panel">
            <h3>Workers</h3>
            <table id="workers"></table>
        </div>
        <div class="panel">
            <h3>Queue</h3>
            <table id="queue"></table>
        </div>
    </div>
    <p class="muted" id="uptime"></p>

    <script>
        function tile(label, value) {
            return '<div class="tile"><div class="value">' + value + '</div>' +
                   '<div class="label">' + label + '</div></div>';
        }

        function render(status) {
            const s = status.stats;
            const g = status.gpu_info;
            document.getElementById('tiles').innerHTML =
                tile('total jobs', s.total_jobs) +
                tile('completed', s.completed_jobs) +
                tile('failed', s.failed_jobs) +
                tile('queued', status.job_queue.length) +
                tile('active workers', s.active_workers) +
                tile('worker failures', s.worker_failures) +
                tile('gpu util', g.avg_utilization.toFixed(1) + '%');

            let rows = '<tr><th>worker</th><th>status</th><th>job</th></tr>';
            for (const w of Object.values(status.workers)) {
                rows += '<tr><td>' + w.worker_id + '</td>' +
                        '<td class="status-' + w.status + '">' + w.status + '</td>' +
                        '<td>' + (w.current_job ? w.current_job.job_id : '-') + '</td></tr>';
            }
            document.getElementById('workers').innerHTML = rows;

            let queue = '<tr><th>job</th><th>type</th><th>priority</th><th>retries</th></tr>';
            for (const job of status.job_queue) {
                queue += '<tr><td>' + job.job_id + '</td><td>' + job.job_type + '</td>' +
                         '<td>' + job.priority + '</td><td>' + job.retry_count + '</td></tr>';
            }
            document.getElementById('queue').innerHTML = queue;

            document.getElementById('uptime').textContent =
                'uptime ' + status.simulation_info.uptime.toFixed(0) + 's, rate ' +
                status.simulation_info.job_generation_rate + ' jobs/min';
        }

        async function applyRate() {
            const rate = parseFloat(document.getElementById('rate').value);
            const res = await fetch('/api/update-job-rate', {
                method: 'POST',
                headers: { 'Content-Type': 'application/json' },
                body: JSON.stringify({ rate: rate })
            });
            const data = await res.json();
            document.getElementById('rate-msg').textContent =
                data.success ? data.message : data.error;
        }

        async function bootstrap() {
            const res = await fetch('/api/status');
            render(await res.json());
            const source = new EventSource('/api/stream');
            source.addEventListener('status_update', (event) => {
                render(JSON.parse(event.data));
            });
        }

        bootstrap();
    </script>
</body>
</html>
"#;
