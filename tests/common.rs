//! Common test utilities for building flows.
use stepflow::prelude::*;

/// A step with a fixed id and the given sub-steps.
#[allow(dead_code)]
pub fn step(id: &str, sub_steps: Vec<SubStep>) -> Step {
    let mut step = Step::new(StepId::from(id), format!("Step {}", id), StepKind::Normal);
    step.sub_steps = sub_steps;
    step
}

/// A sub-step that continues with `next` on both outcomes.
#[allow(dead_code)]
pub fn next(id: &str) -> SubStep {
    let mut sub_step = SubStep::new(SubStepId::from(id));
    sub_step.content = format!("Prompt {}", id);
    sub_step
}

/// A sub-step whose success jumps to `target`.
#[allow(dead_code)]
pub fn goto_on_success(id: &str, target: &str) -> SubStep {
    let mut sub_step = next(id);
    sub_step.success_action = SubStepAction::Goto;
    sub_step.success_step_id = Some(StepId::from(target));
    sub_step
}

#[allow(dead_code)]
pub fn link_success(mut step: Step, target: &str) -> Step {
    step.success_step_id = Some(StepId::from(target));
    step
}

#[allow(dead_code)]
pub fn link_failure(mut step: Step, target: &str) -> Step {
    step.failure_step_id = Some(StepId::from(target));
    step
}

/// A small troubleshooting flow built through the editing API.
///
/// `Check power` asks two questions; if the light stays off it jumps to `Check cable`.
/// Both checks lead to `Resolved` on success and `Escalate` on failure.
#[allow(dead_code)]
pub struct Troubleshooting {
    pub flow: FlowGraphSession,
    pub power: StepId,
    pub cable: StepId,
    pub resolved: StepId,
    pub escalate: StepId,
}

#[allow(dead_code)]
pub fn create_troubleshooting_flow() -> Troubleshooting {
    let mut flow = FlowGraphSession::new();
    let power = flow.add_step("Check power", StepKind::Decision).unwrap();
    let cable = flow.add_step("Check cable", StepKind::Decision).unwrap();
    let resolved = flow.add_step("Resolved", StepKind::Success).unwrap();
    let escalate = flow.add_step("Escalate", StepKind::Failure).unwrap();

    let plugged = flow.add_sub_step(power.as_str()).unwrap();
    flow.update_sub_step_content(power.as_str(), plugged.as_str(), "Is it plugged in?");
    let light = flow.add_sub_step(power.as_str()).unwrap();
    flow.update_sub_step_content(power.as_str(), light.as_str(), "Does the light come on?");
    flow.update_sub_step_config(
        power.as_str(),
        light.as_str(),
        SubStepPatch::new()
            .failure_action(SubStepAction::Goto)
            .failure_target(cable.clone()),
    );

    let seated = flow.add_sub_step(cable.as_str()).unwrap();
    flow.update_sub_step_content(cable.as_str(), seated.as_str(), "Is the cable seated?");

    flow.connect_success(power.as_str(), resolved.as_str());
    flow.connect_failure(power.as_str(), escalate.as_str());
    flow.connect_success(cable.as_str(), resolved.as_str());
    flow.connect_failure(cable.as_str(), escalate.as_str());

    Troubleshooting {
        flow,
        power,
        cable,
        resolved,
        escalate,
    }
}

/// A payload in the shape the visual editor exports.
#[allow(dead_code)]
pub const EDITOR_EXPORT_JSON: &str = r#"{
  "steps": [
    {
      "id": "1700000000001",
      "title": "Greeting",
      "type": "normal",
      "subSteps": [
        {
          "id": "1700000000101",
          "content": "Did the customer answer?",
          "successAction": "next",
          "failureAction": "goto",
          "failureStepId": "1700000000003"
        },
        {
          "id": "1700000000102",
          "content": "Is the customer interested?",
          "successAction": "next",
          "failureAction": "next",
          "successStepId": "",
          "failureStepId": ""
        }
      ],
      "expanded": true,
      "successStepId": "1700000000002",
      "failureStepId": "1700000000003"
    },
    {
      "id": "1700000000002",
      "title": "Closed",
      "type": "success",
      "subSteps": [],
      "expanded": false
    },
    {
      "id": "1700000000003",
      "title": "Lost",
      "type": "failure",
      "subSteps": [],
      "expanded": false,
      "successStepId": null,
      "failureStepId": null
    }
  ],
  "version": "1.0"
}"#;
