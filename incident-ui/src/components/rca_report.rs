use incident_core::model::RcaReport;
use incident_core::view::{RcaPanel, NO_RCA};
use leptos::*;

#[component]
pub fn RcaReportCard(report: Option<RcaReport>) -> impl IntoView {
    let body = match report.as_ref().map(RcaPanel::from_report) {
        None => view! { <p>{NO_RCA}</p> }.into_view(),
        Some(panel) => view! {
            <div>
              <p><strong>"Status:"</strong>" "{panel.status}</p>
              <p><strong>"Summary:"</strong>" "{panel.summary}</p>
              <p><strong>"Likely Trigger:"</strong>" "{panel.likely_trigger}</p>
              <p><strong>"Confidence:"</strong>" "{panel.confidence}</p>
              {panel.affected_endpoints.map(|joined| view! {
                  <p><strong>"Affected Endpoints:"</strong>" "{joined}</p>
              })}
              <p><strong>"Severity Reason:"</strong>" "{panel.severity_reason}</p>
              <p><strong>"Rollback vs Patch:"</strong>" "{panel.rollback_vs_patch}</p>
              {(!panel.recommended_fixes.is_empty()).then(|| view! {
                  <div>
                    <strong>"Recommended Fixes:"</strong>
                    <ul class="list-disc pl-5">
                      {panel.recommended_fixes
                          .iter()
                          .map(|fix| view! { <li>{fix.clone()}</li> })
                          .collect_view()}
                    </ul>
                  </div>
              })}
            </div>
        }
        .into_view(),
    };

    view! {
      <div class="bg-white shadow rounded-lg p-4">
        <h2 class="text-xl font-semibold mb-4">"RCA Report"</h2>
        {body}
      </div>
    }
}
