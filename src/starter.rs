//! Starter template library written by `mailgen init`.

use crate::template::{LibraryFile, TemplateLibrary};

/// File name the starter library is written under.
pub const STARTER_FILE: &str = "starter.toml";

pub const STARTER_LIBRARY: &str = r#"# mailgen starter library
#
# Every template lists its fields and the wording alternatives for the
# subject, each body block and the case comment. A field's domain_token is
# replaced by its value wherever it appears. {{agent.name}} is always
# available and holds your display name.

[[template]]
id = "payment-missing"
name = "Payment not received"
category = "Billing"
subject = [
    "Case #{{case.number}}: payment to {{biller.name}}",
    "Your payment to {{biller.name}} (case #{{case.number}})",
]
case_comment = [
    "Advised {{customer.name}} to contact {{biller.name}} about the missing payment. Agent: {{agent.name}}",
    "{{customer.name}} reported a payment not received by {{biller.name}}. Handled by {{agent.name}}.",
]

[[template.fields]]
key = "customer_name"
label = "Customer name"
placeholder_example = "Jane Doe"
domain_token = "{{customer.name}}"

[[template.fields]]
key = "case_number"
label = "Case number"
input_type = "number"
placeholder_example = "00123"
domain_token = "{{case.number}}"

[[template.fields]]
key = "biller_name"
label = "Biller"
placeholder_example = "City Water"
domain_token = "{{biller.name}}"

[[template.fields]]
key = "recipient_email"
label = "Recipient email"
input_type = "email"

[[template.body]]
label = "Greeting"
variants = [
    '<p>Hello {{customer.name}},</p>',
    '<p>Hi {{customer.name}},</p>',
]

[[template.body]]
label = "Explanation"
variants = [
    '<p>Your payment was sent to <b>{{biller.name}}</b>. Please contact them directly to confirm it was received.</p>',
    '<p>We show the payment as delivered to <b>{{biller.name}}</b>. They can trace it on their side.</p>',
]

[[template.body]]
label = "Closing"
variants = [
    '<p>Kind regards,<br>{{agent.name}}</p>',
    '<p>Best,<br>{{agent.name}}</p>',
]

[[template]]
id = "refund-issued"
name = "Refund issued"
category = "Billing"
subject = "Your refund of {{refund.amount}}"
case_comment = "Refund of {{refund.amount}} issued to {{customer.name}}. Agent: {{agent.name}}"

[[template.fields]]
key = "customer_name"
label = "Customer name"
domain_token = "{{customer.name}}"

[[template.fields]]
key = "refund_amount"
label = "Refund amount"
placeholder_example = "$25.00"
domain_token = "{{refund.amount}}"

[[template.fields]]
key = "recipient_email"
label = "Recipient email"
input_type = "email"

[[template.body]]
label = "Body"
variants = [
    '<p>Hello {{customer.name}},</p><p>A refund of {{refund.amount}} is on its way.</p>',
    '<p>Hi {{customer.name}},</p><p>We have issued a refund of {{refund.amount}}.</p>',
]

[[template]]
id = "password-reset"
name = "Password reset link"
category = "Account"
subject = "Resetting your password"
case_comment = "Sent reset link to {{customer.email}}. Agent: {{agent.name}}"

[[template.fields]]
key = "customer_email"
label = "Customer email"
input_type = "email"
domain_token = "{{customer.email}}"

[[template.body]]
label = "Body"
variants = [
    '<p>We sent a reset link to <a href="mailto:{{customer.email}}">{{customer.email}}</a>.</p>',
]
"#;

/// The starter library, parsed.
pub fn starter_library() -> Result<TemplateLibrary, toml::de::Error> {
    let file: LibraryFile = toml::from_str(STARTER_LIBRARY)?;
    Ok(TemplateLibrary::from_templates(file.templates))
}
