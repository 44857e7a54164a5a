//! Prompt templates for the two generation rounds

use crate::chain::request::ChainRequest;

/// Templates for generating prompts at each round
///
/// Subject, topic and questions text are substituted verbatim. Nothing is
/// escaped, so text typed into the form can change how the model reads the
/// surrounding instructions; callers accept that.
pub struct PromptTemplate;

impl PromptTemplate {
    /// User prompt for the questions round
    pub fn question_chain(request: &ChainRequest) -> String {
        Self::compose(request.subject(), request.topic())
    }

    /// Fill the question-chain template with a subject and a topic.
    ///
    /// Performs no validation; see [`ChainRequest::try_new`].
    pub fn compose(subject: &str, topic: &str) -> String {
        format!(
            r#"通用学科链式问题生成Prompt

请你以【{subject}】领域的资深教师身份，基于以下核心要求，针对【{topic}】生成一组具有强关联性的链式问题。

### 核心要求

1.  **关联性逻辑**：问题链需遵循“基础认知→深度理解→应用迁移→拓展延伸→综合创新”的递进逻辑，后一个问题必须建立在前一个问题的答案基础上，形成环环相扣的逻辑链条，禁止出现孤立无关联的问题。

2.  **学科适配性**：问题需贴合指定学科的学科特点（如理科侧重公式推导、实验分析；文科侧重概念辨析、逻辑论证；语文学科侧重读写结合；艺术类侧重审美体验等），避免出现跨学科的无关导向。

3.  **难度梯度**：从基础题（考查对核心概念的基本记忆与识别）逐步过渡到中档题（考查对知识点的理解与简单应用），最终到提高题（考查知识迁移、综合运用或创新思考），梯度清晰可辨。

4.  **问题类型多样**：结合学科特点融入多种题型，如选择题、填空题、简答题、计算题、实验设计题、论述题、案例分析题等，避免单一题型的重复。

5.  **数量要求**：每组问题链包含5-8个问题，确保逻辑链条的完整性与紧凑性，不冗余不残缺。

### 输出规范

1.  先明确标注“学科：XXX”“核心知识点：XXX”；

2.  按顺序编号列出问题，每个问题后用括号标注题型与难度（基础/中档/提高）；

3.  最后附加一段“关联逻辑说明”，简要阐述每个问题与前一个问题的关联点，以及整体链条的递进逻辑。

### 示例引导（仅作逻辑参考，需结合指定学科调整）

学科：初中物理 核心知识点：凸透镜成像规律

1.  凸透镜的基本光学性质是什么？请列举2点（简答题，基础）

2.  基于凸透镜对光线的会聚作用，当物体位于凸透镜2倍焦距以外时，所成的像具有哪些特点（像的虚实、大小、正倒）？（简答题，基础）

...

关联逻辑说明：问题1搭建基础认知，问题2基于基础性质聚焦特定成像场景...
"#
        )
    }

    /// User prompt for the answers round, built from the full questions text
    pub fn answers(questions_text: &str) -> String {
        format!(
            r#"请针对以下生成的问题链，逐一提供详细、准确的答案：

{questions_text}

### 答案输出要求：
1. 按照问题顺序逐一回答，每个答案前标注对应的问题编号
2. 答案要准确、详细，符合学科规范
3. 对于需要计算或推导的问题，展示完整的解题过程
4. 保持答案的专业性和教育性
"#
        )
    }
}
