//! Embedded web assets for the workflow map page.

/// Replaced with the scene JSON when exporting a static page.
pub const EMBED_MARKER: &str = "/*__STATEMAP_SCENE__*/null";

pub const INDEX_HTML: &str = r#"<!DOCTYPE html>
<html lang="en">
<head>
    <meta charset="UTF-8">
    <meta name="viewport" content="width=device-width, initial-scale=1.0">
    <title>Statemap - Workflow</title>
    <script src="https://unpkg.com/cytoscape@3.30.2/dist/cytoscape.min.js"></script>
    <style>
        * {
            margin: 0;
            padding: 0;
            box-sizing: border-box;
        }

        body {
            font-family: -apple-system, BlinkMacSystemFont, 'Segoe UI', Roboto, Oxygen, Ubuntu, sans-serif;
            background: #1a1a2e;
            color: #eee;
            overflow: hidden;
        }

        #container {
            display: flex;
            height: 100vh;
        }

        #graph {
            flex: 1;
            background: #f4f6f8;
        }

        #sidebar {
            width: 320px;
            background: #1a1a2e;
            border-left: 1px solid #333;
            padding: 20px;
            overflow-y: auto;
        }

        h1 {
            font-size: 1.4em;
            margin-bottom: 10px;
            color: #00d9ff;
        }

        h2 {
            font-size: 1.1em;
            margin: 15px 0 10px;
            color: #888;
            text-transform: uppercase;
            letter-spacing: 1px;
        }

        .stat {
            display: flex;
            justify-content: space-between;
            padding: 8px 0;
            border-bottom: 1px solid #333;
        }

        .stat-value {
            color: #00d9ff;
            font-weight: bold;
        }

        .legend-item {
            display: flex;
            align-items: center;
            gap: 8px;
            font-size: 0.85em;
            padding: 4px 0;
        }

        .legend-node {
            width: 18px;
            height: 12px;
            border: 2px solid;
        }

        .legend-edge {
            width: 24px;
            height: 0;
            border-top-width: 2px;
        }

        .controls {
            display: grid;
            grid-template-columns: repeat(3, 1fr);
            gap: 6px;
        }

        .controls button, #draft button {
            background: #333;
            color: #eee;
            border: 1px solid #555;
            border-radius: 4px;
            padding: 6px;
            cursor: pointer;
        }

        .controls button:hover, #draft button:hover {
            background: #444;
        }

        #draft {
            display: flex;
            gap: 6px;
            align-items: center;
        }

        #draft-status {
            font-size: 0.85em;
            color: #aaa;
        }

        #warnings li, #events li {
            font-size: 0.8em;
            margin-left: 16px;
            padding: 2px 0;
        }

        #warnings li {
            color: #ffe66d;
        }
    </style>
</head>
<body>
    <div id="container">
        <div id="graph"></div>
        <div id="sidebar">
            <h1>Statemap</h1>

            <h2>Summary</h2>
            <div id="stats">
                <div class="stat"><span>States</span><span class="stat-value" id="stat-states">-</span></div>
                <div class="stat"><span>Transitions</span><span class="stat-value" id="stat-edges">-</span></div>
                <div class="stat"><span>Zoom</span><span class="stat-value" id="stat-zoom">-</span></div>
            </div>

            <h2>Legend</h2>
            <div id="legend"></div>

            <h2>View</h2>
            <div class="controls">
                <button data-action="zoom-in">Zoom +</button>
                <button data-action="pan-up">&uarr;</button>
                <button data-action="zoom-out">Zoom -</button>
                <button data-action="pan-left">&larr;</button>
                <button data-action="fit">Fit</button>
                <button data-action="pan-right">&rarr;</button>
                <span></span>
                <button data-action="pan-down">&darr;</button>
                <span></span>
            </div>

            <h2>New transition</h2>
            <div id="draft">
                <button id="draft-arm">Add</button>
                <button id="draft-cancel">Cancel</button>
                <span id="draft-status">idle</span>
            </div>

            <h2>Warnings</h2>
            <ul id="warnings"></ul>

            <h2>Events</h2>
            <ul id="events"></ul>
        </div>
    </div>

    <script>
        const EMBEDDED = /*__STATEMAP_SCENE__*/null;
        const live = EMBEDDED === null;
        let cy;

        async function post(path) {
            const response = await fetch(path, { method: 'POST' });
            return response.ok ? response.json() : null;
        }

        async function loadScene() {
            if (!live) return EMBEDDED;
            const response = await fetch('/api/scene');
            return response.json();
        }

        function applyScene(scene) {
            if (!cy) {
                cy = cytoscape({
                    container: document.getElementById('graph'),
                    elements: scene.elements,
                    style: scene.style,
                    layout: { name: 'preset' },
                    userZoomingEnabled: !live,
                    userPanningEnabled: !live,
                    autoungrabify: true,
                });
                cy.on('tap', 'node', async (evt) => {
                    if (!live) return;
                    await post('/api/nodes/' + encodeURIComponent(evt.target.id()) + '/click');
                    applyScene(await loadScene());
                });
            } else {
                cy.json({ elements: scene.elements });
                cy.style(scene.style);
            }
            cy.viewport({ zoom: scene.zoom, pan: scene.pan });

            const states = scene.elements.nodes.filter(n => n.data.kind === 'state').length;
            const transitions = new Set(scene.elements.edges
                .filter(e => e.classes.includes('edge-transition'))
                .map(e => e.data.id.split('::')[0])).size;
            document.getElementById('stat-states').textContent = states;
            document.getElementById('stat-edges').textContent = transitions;
            document.getElementById('stat-zoom').textContent = Math.round(scene.zoom * 100) + '%';
            document.getElementById('draft-status').textContent =
                scene.highlighted ? 'from ' + scene.highlighted : scene.selection;

            const warnings = document.getElementById('warnings');
            warnings.innerHTML = '';
            scene.warnings.forEach(w => {
                const li = document.createElement('li');
                li.textContent = w.message;
                warnings.appendChild(li);
            });
        }

        async function loadLegend() {
            const entries = live
                ? await (await fetch('/api/legend')).json()
                : (EMBEDDED.legend || []);
            const legend = document.getElementById('legend');
            entries.forEach(entry => {
                const item = document.createElement('div');
                item.className = 'legend-item';
                const swatch = document.createElement('div');
                if (entry.element === 'node') {
                    swatch.className = 'legend-node';
                    swatch.style.background = entry.style.fillColor;
                    swatch.style.borderColor = entry.style.borderColor;
                } else {
                    swatch.className = 'legend-edge';
                    swatch.style.borderTopStyle = entry.style.lineStyle;
                    swatch.style.borderTopColor = entry.style.lineColor;
                }
                const caption = document.createElement('span');
                caption.textContent = entry.caption;
                item.appendChild(swatch);
                item.appendChild(caption);
                legend.appendChild(item);
            });
        }

        function setupControls() {
            document.querySelectorAll('.controls button').forEach(button => {
                button.addEventListener('click', async () => {
                    const action = button.dataset.action;
                    if (live) {
                        await post('/api/viewport/' + action);
                        applyScene(await loadScene());
                    } else if (action === 'fit') {
                        cy.fit(undefined, 30);
                    } else if (action.startsWith('zoom')) {
                        const factor = action === 'zoom-in' ? 1.1 : 1 / 1.1;
                        cy.zoom({ level: cy.zoom() * factor, renderedPosition: { x: cy.width() / 2, y: cy.height() / 2 } });
                    } else {
                        const step = { 'pan-left': [1, 0], 'pan-right': [-1, 0], 'pan-up': [0, 1], 'pan-down': [0, -1] }[action];
                        cy.panBy({ x: step[0] * cy.width() * 0.1, y: step[1] * cy.height() * 0.1 });
                    }
                });
            });

            document.getElementById('draft-arm').addEventListener('click', async () => {
                if (!live) return;
                await post('/api/draft/arm');
                applyScene(await loadScene());
            });
            document.getElementById('draft-cancel').addEventListener('click', async () => {
                if (!live) return;
                await post('/api/draft/cancel');
                applyScene(await loadScene());
            });
        }

        // Server-Sent Events: viewer events relayed to the page
        function setupSSE() {
            if (!live) return;
            const evtSource = new EventSource('/api/events');
            evtSource.addEventListener('viewer', (event) => {
                const data = JSON.parse(event.data);
                const li = document.createElement('li');
                if (data.type === 'transitionCreateRequested') {
                    li.textContent = 'create transition ' + data.startNodeId + ' → ' + data.endNodeId;
                } else if (data.type === 'nodeClicked') {
                    li.textContent = 'clicked ' + data.kind + ' ' + data.nodeId;
                } else {
                    li.textContent = 'viewport ' + Math.round(data.zoom * 100) + '%';
                }
                const list = document.getElementById('events');
                list.insertBefore(li, list.firstChild);
                while (list.children.length > 20) list.removeChild(list.lastChild);
            });
            evtSource.onerror = () => {
                console.log('SSE connection lost, reconnecting...');
            };
        }

        (async () => {
            applyScene(await loadScene());
            await loadLegend();
            setupControls();
            setupSSE();
        })();
    </script>
</body>
</html>
"#;

/// Static page with the scene baked in; no server needed to view it.
pub fn static_html(scene: &serde_json::Value) -> String {
    // `</` inside a script block would end it early.
    let json = scene.to_string().replace("</", "<\\/");
    INDEX_HTML.replacen(EMBED_MARKER, &json, 1)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_static_html_embeds_scene() {
        let html = static_html(&json!({ "zoom": 1.5, "label": "</script>" }));
        assert!(!html.contains(EMBED_MARKER));
        assert!(html.contains(r#""zoom":1.5"#));
        assert!(html.contains(r#"<\/script>"#));
    }

    #[test]
    fn test_index_has_marker() {
        assert_eq!(INDEX_HTML.matches(EMBED_MARKER).count(), 1);
    }
}
